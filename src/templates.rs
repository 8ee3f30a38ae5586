use actix_web::HttpResponse;
use askama::Template;

use crate::models::Testimonial;

pub fn render<T: Template>(template: T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Template render error: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Star glyphs for a 1-5 rating, filled first.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[derive(Clone, Debug)]
pub struct TestimonialView {
    pub position: usize,
    pub name: &'static str,
    pub role: &'static str,
    pub company: &'static str,
    pub content: &'static str,
    pub avatar_url: &'static str,
    pub stars: String,
    pub active: bool,
}

impl TestimonialView {
    pub fn new(position: usize, testimonial: &Testimonial, active: bool) -> Self {
        Self {
            position,
            name: testimonial.name,
            role: testimonial.role,
            company: testimonial.company,
            content: testimonial.content,
            avatar_url: testimonial.avatar_url,
            stars: stars(testimonial.rating),
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_fill_up_to_rating() {
        assert_eq!(stars(5), "★★★★★");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }
}
