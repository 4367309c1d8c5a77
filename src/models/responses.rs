use serde::{Deserialize, Serialize};
use crate::models::domain::{Coordinate, RankedRestaurant, TimeOfDay};

/// One entry of a search result, as shown to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantView {
    #[serde(flatten)]
    pub ranked: RankedRestaurant,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub origin: Coordinate,
    #[serde(rename = "evaluatedAt")]
    pub evaluated_at: TimeOfDay,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "activeFilters")]
    pub active_filters: usize,
    pub restaurants: Vec<RestaurantView>,
}

/// Current favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
    pub count: usize,
}

/// Result of a favorite toggle
///
/// `persisted` is false when the store write failed; the toggle still applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
    pub favorites: Vec<String>,
    pub count: usize,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
