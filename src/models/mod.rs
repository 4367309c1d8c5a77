// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, FilterCriteria, InputError, LocationQuery, PriceTier, RankedRestaurant, Restaurant, TimeOfDay, MINUTES_PER_DAY};
pub use requests::{SearchRequest, ToggleFavoriteRequest};
pub use responses::{ErrorResponse, FavoritesResponse, HealthResponse, RestaurantView, SearchResponse, ToggleFavoriteResponse};
