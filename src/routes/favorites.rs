use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{FavoritesResponse, ToggleFavoriteRequest, ToggleFavoriteResponse};
use crate::routes::{error_response, AppState};

/// Configure favorites routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/favorites", web::get().to(list_favorites))
        .route("/favorites/toggle", web::post().to(toggle_favorite));
}

/// GET /api/v1/favorites
async fn list_favorites(state: web::Data<AppState>) -> impl Responder {
    let favorites: Vec<String> = state.favorites.snapshot().into_iter().collect();

    HttpResponse::Ok().json(FavoritesResponse {
        count: favorites.len(),
        favorites,
    })
}

/// Toggle a favorite
///
/// POST /api/v1/favorites/toggle
///
/// Request body:
/// ```json
/// { "restaurantId": "string" }
/// ```
/// A failed store write still returns 200 with `persisted: false`.
async fn toggle_favorite(
    state: web::Data<AppState>,
    req: web::Json<ToggleFavoriteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let outcome = state.favorites.toggle(&req.restaurant_id).await;
    let persisted = outcome.persisted();
    let warning = outcome
        .persist_error
        .map(|e| format!("Favorite saved for this session only: {}", e));
    let favorites: Vec<String> = outcome.favorites.into_iter().collect();

    HttpResponse::Ok().json(ToggleFavoriteResponse {
        count: favorites.len(),
        favorites,
        is_favorite: outcome.is_favorite,
        persisted,
        warning,
    })
}
