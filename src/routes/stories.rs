use actix_web::{http::header, web, HttpResponse, Result};
use askama::Template;
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::WatchStream, StreamExt};
use uuid::Uuid;

use crate::{
    carousel::{Carousel, CarouselDriver, CarouselError},
    content,
    state::AppState,
    templates::{render, TestimonialView},
};

#[derive(Template)]
#[template(path = "stories.html")]
struct StoriesTemplate {
    slides: Vec<TestimonialView>,
    active_index: usize,
    prev_index: usize,
    next_index: usize,
    interval_ms: u128,
    auto_play: bool,
}

#[derive(Deserialize)]
struct StoriesQuery {
    slide: Option<usize>,
    auto_play: Option<bool>,
}

#[derive(Serialize)]
struct SlideEvent<'a> {
    viewer: Uuid,
    index: usize,
    auto_play: bool,
    name: &'a str,
}

#[derive(Serialize)]
struct NavigationResponse {
    index: usize,
    auto_play: bool,
}

impl From<Carousel> for NavigationResponse {
    fn from(carousel: Carousel) -> Self {
        Self {
            index: carousel.index(),
            auto_play: carousel.auto_play(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stories").route(web::get().to(stories_page)))
        .service(web::resource("/stories/events").route(web::get().to(stream_slides)))
        .service(web::resource("/stories/{viewer}/next").route(web::post().to(next_slide)))
        .service(web::resource("/stories/{viewer}/prev").route(web::post().to(prev_slide)))
        .service(
            web::resource("/stories/{viewer}/goto/{index}").route(web::post().to(go_to_slide)),
        );
}

async fn stories_page(
    state: web::Data<AppState>,
    query: web::Query<StoriesQuery>,
) -> Result<HttpResponse> {
    let carousel = match initial_carousel(&query) {
        Ok(carousel) => carousel,
        Err(err) => {
            log::error!("Stories page unavailable: {err}");
            return Ok(HttpResponse::ServiceUnavailable().finish());
        }
    };

    let slides = content::testimonials()
        .iter()
        .enumerate()
        .map(|(position, testimonial)| {
            TestimonialView::new(position, testimonial, position == carousel.index())
        })
        .collect();

    Ok(render(StoriesTemplate {
        slides,
        active_index: carousel.index(),
        prev_index: carousel.peek_prev(),
        next_index: carousel.peek_next(),
        interval_ms: state.carousel_interval.as_millis(),
        auto_play: carousel.auto_play(),
    }))
}

/// Out-of-range slides are ignored. An explicit slide counts as manual
/// navigation unless `auto_play` says otherwise.
fn initial_carousel(query: &StoriesQuery) -> Result<Carousel, CarouselError> {
    let mut carousel = Carousel::new(content::testimonials().len())?;
    if let Some(slide) = query.slide {
        if let Err(err) = carousel.go_to(slide) {
            log::debug!("Ignoring requested slide: {err}");
        }
    }
    if let Some(auto_play) = query.auto_play {
        carousel.set_auto_play(auto_play);
    }
    Ok(carousel)
}

async fn stream_slides(
    state: web::Data<AppState>,
    query: web::Query<StoriesQuery>,
) -> HttpResponse {
    let carousel = match initial_carousel(&query) {
        Ok(carousel) => carousel,
        Err(err) => {
            log::error!("Unable to mount carousel: {err}");
            return HttpResponse::ServiceUnavailable().finish();
        }
    };
    let lease = state.viewers.mount(carousel, state.carousel_interval);
    let viewer = lease.viewer();
    let updates = lease.driver().subscribe();

    // The lease rides inside the stream; the carousel unmounts when the
    // client disconnects and actix drops the body.
    let mounted = tokio_stream::once(Ok::<web::Bytes, actix_web::Error>(mounted_to_bytes(viewer)));
    let slides = WatchStream::new(updates).map(move |carousel| {
        Ok::<web::Bytes, actix_web::Error>(slide_to_bytes(lease.viewer(), &carousel))
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(mounted.chain(slides))
}

fn mounted_to_bytes(viewer: Uuid) -> web::Bytes {
    let payload = serde_json::json!({ "viewer": viewer.to_string() });
    web::Bytes::from(format!("event: mounted\ndata: {}\n\n", payload))
}

fn slide_to_bytes(viewer: Uuid, carousel: &Carousel) -> web::Bytes {
    let name = content::testimonials()
        .get(carousel.index())
        .map(|testimonial| testimonial.name)
        .unwrap_or_default();
    let event = SlideEvent {
        viewer,
        index: carousel.index(),
        auto_play: carousel.auto_play(),
        name,
    };
    let payload = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
    web::Bytes::from(format!("event: slide\ndata: {}\n\n", payload))
}

fn viewer_driver(state: &AppState, raw: &str) -> Option<std::sync::Arc<CarouselDriver>> {
    let viewer = Uuid::parse_str(raw).ok()?;
    state.viewers.get(&viewer)
}

async fn next_slide(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match viewer_driver(&state, &path.into_inner()) {
        Some(driver) => HttpResponse::Ok().json(NavigationResponse::from(driver.next())),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn prev_slide(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match viewer_driver(&state, &path.into_inner()) {
        Some(driver) => HttpResponse::Ok().json(NavigationResponse::from(driver.prev())),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn go_to_slide(state: web::Data<AppState>, path: web::Path<(String, usize)>) -> HttpResponse {
    let (viewer, index) = path.into_inner();
    let Some(driver) = viewer_driver(&state, &viewer) else {
        return HttpResponse::NotFound().finish();
    };
    match driver.go_to(index) {
        Ok(carousel) => HttpResponse::Ok().json(NavigationResponse::from(carousel)),
        Err(err @ CarouselError::OutOfRange { .. }) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": err.to_string() }))
        }
        Err(err) => {
            log::error!("Carousel navigation failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
