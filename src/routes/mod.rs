// Route exports
pub mod favorites;
pub mod restaurants;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::models::ErrorResponse;
use crate::services::{FavoritesSet, KeyValueStore, SearchService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub favorites: Arc<FavoritesSet>,
    pub store: Arc<dyn KeyValueStore>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(restaurants::configure)
            .configure(favorites::configure),
    );
}

/// Uniform JSON error body
pub(crate) fn error_response(
    status: actix_web::http::StatusCode,
    error: &str,
    message: impl ToString,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}
