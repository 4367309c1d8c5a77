use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::is_open_now;
use crate::models::{HealthResponse, RestaurantView, SearchRequest, SearchResponse};
use crate::routes::{error_response, AppState};
use crate::services::{ProviderError, SearchError};

/// Configure health and search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/restaurants/search", web::post().to(search_restaurants));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// POST /api/v1/restaurants/search
///
/// Request body:
/// ```json
/// {
///   "address": "string",
///   "lat": 40.7128,
///   "lng": -74.006,
///   "filters": { "cuisine": "Italian", "priceRange": "$$", "minRating": 4.0, "openNow": true },
///   "favoritesOnly": false
/// }
/// ```
/// Either `address` or `lat`/`lng` must be present, not both.
async fn search_restaurants(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let query = match req.location_query() {
        Ok(query) => query,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Invalid location", e),
    };

    let outcome = match state.search.search(&query, &req.filters, req.favorites_only).await {
        Ok(outcome) => outcome,
        Err(SearchError::Input(e)) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid filters", e);
        }
        Err(SearchError::Provider(e @ ProviderError::NotFound(_))) => {
            return error_response(StatusCode::NOT_FOUND, "Location not found", e);
        }
        Err(SearchError::Provider(e @ ProviderError::Unavailable(_))) => {
            return error_response(StatusCode::BAD_GATEWAY, "Candidate provider unavailable", e);
        }
    };

    let now = outcome.evaluated_at;
    let restaurants = outcome
        .results
        .into_iter()
        .map(|ranked| RestaurantView {
            is_open: is_open_now(&ranked.restaurant, now),
            is_favorite: state.favorites.contains(&ranked.restaurant.id),
            ranked,
        })
        .collect();

    HttpResponse::Ok().json(SearchResponse {
        origin: outcome.origin,
        evaluated_at: now,
        total_candidates: outcome.total_candidates,
        active_filters: req.filters.active_count(),
        restaurants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use std::sync::Arc;
    use crate::core::{FixedClock, Ranker};
    use crate::models::{Coordinate, PriceTier, Restaurant, TimeOfDay};
    use crate::services::{
        CandidateSet, FavoritesSet, MemoryStore, SearchService, StaticCandidateProvider,
        DEFAULT_FAVORITES_KEY,
    };

    async fn test_state() -> AppState {
        let t = |h, m| TimeOfDay::new(h, m).unwrap();
        let candidates = CandidateSet {
            origin: Coordinate::new(40.7128, -74.0060),
            restaurants: vec![Restaurant {
                id: "r1".to_string(),
                name: "Trattoria".to_string(),
                coordinate: Coordinate::new(40.72, -74.01),
                cuisine: "Italian".to_string(),
                price_tier: PriceTier::Moderate,
                rating: 4.5,
                opening_time: Some(t(11, 0)),
                closing_time: Some(t(22, 0)),
                address: None,
                phone: None,
                description: None,
            }],
        };

        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let favorites = Arc::new(FavoritesSet::load(store.clone(), DEFAULT_FAVORITES_KEY).await);
        let ranker = Ranker::new(Arc::new(FixedClock(t(12, 0))));
        let search = SearchService::new(
            Arc::new(StaticCandidateProvider::new(candidates)),
            ranker,
            favorites.clone(),
        );

        AppState {
            search,
            favorites,
            store,
        }
    }

    #[actix_web::test]
    async fn test_search_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state().await))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/restaurants/search")
            .set_json(serde_json::json!({"address": "Union Square", "filters": {"cuisine": "Italian"}}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalCandidates"], 1);
        assert_eq!(body["activeFilters"], 1);
        assert_eq!(body["restaurants"][0]["id"], "r1");
        assert_eq!(body["restaurants"][0]["isOpen"], true);
        assert_eq!(body["restaurants"][0]["isFavorite"], false);
        assert!(body["restaurants"][0]["distanceKm"].as_f64().unwrap() > 0.0);
    }

    #[actix_web::test]
    async fn test_search_requires_location() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state().await))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/restaurants/search")
            .set_json(serde_json::json!({"filters": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state().await))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "memory");
    }
}
