use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Coordinate, FilterCriteria, InputError, LocationQuery};

/// Request to search for restaurants around an address or a coordinate
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 512))]
    #[serde(default)]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default, alias = "longitude")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub filters: FilterCriteria,
    #[serde(default, rename = "favoritesOnly", alias = "favorites_only")]
    pub favorites_only: bool,
}

impl SearchRequest {
    /// Exactly one of `address` or the `lat`/`lng` pair must be given
    pub fn location_query(&self) -> Result<LocationQuery, InputError> {
        let query = match (&self.address, self.lat, self.lng) {
            (Some(address), None, None) => LocationQuery::Address(address.trim().to_string()),
            (None, Some(lat), Some(lng)) => LocationQuery::Coordinates(Coordinate::new(lat, lng)),
            (None, None, None) => {
                return Err(InputError::InvalidLocation(
                    "either address or lat/lng is required".to_string(),
                ))
            }
            (Some(_), _, _) => {
                return Err(InputError::InvalidLocation(
                    "address and lat/lng are mutually exclusive".to_string(),
                ))
            }
            _ => {
                return Err(InputError::InvalidLocation(
                    "lat and lng must be given together".to_string(),
                ))
            }
        };

        query.validate()?;
        Ok(query)
    }
}

/// Request to flip a restaurant's favorite status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleFavoriteRequest {
    #[validate(length(min = 1, max = 256))]
    #[serde(alias = "restaurant_id", rename = "restaurantId")]
    pub restaurant_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_query() {
        let req = SearchRequest {
            address: Some(" 1 Main St ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            req.location_query().unwrap(),
            LocationQuery::Address("1 Main St".to_string())
        );
    }

    #[test]
    fn test_coordinate_query() {
        let req = SearchRequest {
            lat: Some(40.7128),
            lng: Some(-74.0060),
            ..Default::default()
        };
        assert_eq!(
            req.location_query().unwrap(),
            LocationQuery::Coordinates(Coordinate::new(40.7128, -74.0060))
        );
    }

    #[test]
    fn test_ambiguous_or_missing_location() {
        assert!(SearchRequest::default().location_query().is_err());

        let both = SearchRequest {
            address: Some("Main St".to_string()),
            lat: Some(1.0),
            lng: Some(1.0),
            ..Default::default()
        };
        assert!(both.location_query().is_err());

        let half = SearchRequest {
            lat: Some(1.0),
            ..Default::default()
        };
        assert!(half.location_query().is_err());
    }

    #[test]
    fn test_request_validation() {
        let req = SearchRequest {
            lat: Some(120.0),
            lng: Some(0.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let toggle = ToggleFavoriteRequest {
            restaurant_id: String::new(),
        };
        assert!(toggle.validate().is_err());
    }

    #[test]
    fn test_search_request_json() {
        let json = r#"{"lat": 40.7, "lng": -74.0, "filters": {"cuisine": "Italian"}, "favoritesOnly": true}"#;
        let req: SearchRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.filters.cuisine.as_deref(), Some("Italian"));
        assert!(req.favorites_only);
    }
}
