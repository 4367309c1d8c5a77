//! Restaurant Finder - discovery and ranking core for location-based restaurant lookup
//!
//! Given the candidates a provider returns around a search origin, this library
//! filters them against user-selected criteria, orders them by straight-line
//! distance, and answers whether a restaurant is open at a given time of day.
//! A favorites set mirrored to a key-value store supports a "favorites only" view.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance_km, is_open, matches_criteria, rank, Clock, FixedClock, Ranker, SystemClock};
pub use crate::models::{Coordinate, FilterCriteria, InputError, LocationQuery, PriceTier, RankedRestaurant, Restaurant, TimeOfDay};
pub use crate::services::{FavoritesSet, KeyValueStore, SearchService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let origin = Coordinate::new(40.7128, -74.0060);
        assert_eq!(distance_km(&origin, &origin), 0.0);
    }
}
