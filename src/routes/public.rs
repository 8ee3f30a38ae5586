use actix_web::{web, HttpResponse, Result};
use askama::Template;
use serde::Serialize;

use crate::{
    booking::{BookingField, BookingForm, BookingSnapshot, SubmitOutcome},
    content,
    models::{DeviceCategory, DeviceOption, DeviceType, Highlight, Location, PhoneLine},
    state::AppState,
    templates::{render, TestimonialView},
};

#[derive(Clone, Debug, Default)]
struct BookingView {
    full_name: String,
    email: String,
    phone: String,
    issue_description: String,
    device_options: Vec<DeviceOption>,
    progress_percent: u32,
    message: String,
    message_is_error: bool,
    errors: Vec<String>,
}

impl BookingView {
    fn from_form(form: BookingForm) -> Self {
        let progress_percent = percent(form.completion_ratio());
        Self {
            device_options: content::device_options(&form.device_type),
            full_name: form.full_name,
            email: form.email,
            phone: form.phone,
            issue_description: form.issue_description,
            progress_percent,
            ..Self::default()
        }
    }

    fn from_snapshot(snapshot: BookingSnapshot) -> Self {
        let mut view = Self::from_form(snapshot.form);
        view.progress_percent = percent(snapshot.completion_ratio);
        if let Some(message) = snapshot.message {
            view.message = message.text().to_string();
            view.message_is_error = !message.is_success();
        }
        view
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    business_name: &'static str,
    contact_email: &'static str,
    highlights: Vec<Highlight>,
    devices: Vec<DeviceCategory>,
    booking: BookingView,
    testimonial: Option<TestimonialView>,
    locations: Vec<Location>,
    phones: Vec<PhoneLine>,
}

impl HomeTemplate {
    fn with_booking(booking: BookingView) -> Self {
        let testimonial = content::testimonials()
            .first()
            .map(|first| TestimonialView::new(0, first, true));
        Self {
            business_name: content::BUSINESS_NAME,
            contact_email: content::CONTACT_EMAIL,
            highlights: content::highlights(),
            devices: content::device_catalog(),
            booking,
            testimonial,
            locations: content::locations(),
            phones: content::phone_lines(),
        }
    }
}

#[derive(Serialize)]
struct ProgressResponse {
    completion_ratio: f64,
    percent: u32,
    completed: usize,
    total: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/book").route(web::post().to(submit_booking)))
        .service(web::resource("/api/booking/progress").route(web::post().to(booking_progress)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn home() -> Result<HttpResponse> {
    Ok(render(HomeTemplate::with_booking(BookingView::from_form(
        BookingForm::default(),
    ))))
}

async fn submit_booking(
    state: web::Data<AppState>,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let errors = required_field_errors(&form);
    if !errors.is_empty() {
        let mut booking = BookingView::from_form(form);
        booking.errors = errors;
        return Ok(render(HomeTemplate::with_booking(booking)));
    }

    let controller = state.booking_controller().with_form(form);
    if let SubmitOutcome::Finished(message) = controller.submit().await {
        log::info!("Booking request finished: {}", message.text());
    }

    Ok(render(HomeTemplate::with_booking(BookingView::from_snapshot(
        controller.snapshot(),
    ))))
}

async fn booking_progress(form: web::Json<BookingForm>) -> HttpResponse {
    let form = form.into_inner();
    let completion_ratio = form.completion_ratio();
    HttpResponse::Ok().json(ProgressResponse {
        completion_ratio,
        percent: percent(completion_ratio),
        completed: form.completed_fields(),
        total: BookingField::ALL.len(),
    })
}

/// Server-side stand-in for the browser's `required` checks.
fn required_field_errors(form: &BookingForm) -> Vec<String> {
    let mut errors: Vec<String> = form
        .missing_fields()
        .into_iter()
        .map(|field| required_message(field).to_string())
        .collect();

    let device = form.device_type.as_str();
    if !device.is_empty() && device.parse::<DeviceType>().is_err() {
        errors.push(required_message(BookingField::DeviceType).to_string());
    }
    errors
}

fn required_message(field: BookingField) -> &'static str {
    match field {
        BookingField::FullName => "Full name is required.",
        BookingField::Email => "Email address is required.",
        BookingField::Phone => "Phone number is required.",
        BookingField::DeviceType => "Please select your device type.",
        BookingField::IssueDescription => "Please describe the issue with your device.",
    }
}

fn percent(ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u32
}
