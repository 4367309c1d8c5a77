use crate::core::hours::is_open;
use crate::models::{FilterCriteria, PriceTier, Restaurant, TimeOfDay};

/// Check a restaurant against every active criterion
///
/// Criteria combine with logical AND and there is no partial credit. The
/// exact-match checks run before the open-status check.
#[inline]
pub fn matches_criteria(
    restaurant: &Restaurant,
    criteria: &FilterCriteria,
    now: TimeOfDay,
) -> bool {
    matches_cuisine(restaurant, criteria.cuisine.as_deref())
        && matches_price_tier(restaurant, criteria.price_tier)
        && meets_min_rating(restaurant, criteria.min_rating)
        && (!criteria.open_now_only || is_open_now(restaurant, now))
}

/// Case-sensitive exact cuisine match
#[inline]
pub fn matches_cuisine(restaurant: &Restaurant, cuisine: Option<&str>) -> bool {
    cuisine.map_or(true, |cuisine| restaurant.cuisine == cuisine)
}

#[inline]
pub fn matches_price_tier(restaurant: &Restaurant, tier: Option<PriceTier>) -> bool {
    tier.map_or(true, |tier| restaurant.price_tier == tier)
}

/// Rating at or above the minimum
#[inline]
pub fn meets_min_rating(restaurant: &Restaurant, min_rating: Option<f64>) -> bool {
    min_rating.map_or(true, |min| restaurant.rating >= min)
}

/// Open at `now`; unknown hours are closed
#[inline]
pub fn is_open_now(restaurant: &Restaurant, now: TimeOfDay) -> bool {
    is_open(restaurant.opening_time, restaurant.closing_time, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn create_test_restaurant(cuisine: &str, tier: PriceTier, rating: f64) -> Restaurant {
        Restaurant {
            id: "test_restaurant".to_string(),
            name: "Test Restaurant".to_string(),
            coordinate: Coordinate::new(40.7128, -74.0060),
            cuisine: cuisine.to_string(),
            price_tier: tier,
            rating,
            opening_time: Some(t(11, 0)),
            closing_time: Some(t(22, 0)),
            address: None,
            phone: None,
            description: None,
        }
    }

    #[test]
    fn test_no_criteria_matches_everything() {
        let restaurant = create_test_restaurant("Thai", PriceTier::Moderate, 1.0);
        assert!(matches_criteria(&restaurant, &FilterCriteria::default(), t(3, 0)));
    }

    #[test]
    fn test_cuisine_is_case_sensitive() {
        let restaurant = create_test_restaurant("Italian", PriceTier::Moderate, 4.0);

        assert!(matches_cuisine(&restaurant, Some("Italian")));
        assert!(!matches_cuisine(&restaurant, Some("italian")));
    }

    #[test]
    fn test_price_tier_exact_match() {
        let restaurant = create_test_restaurant("Italian", PriceTier::Moderate, 4.0);
        let criteria = FilterCriteria::default().with_price_tier(PriceTier::Inexpensive);

        assert!(!matches_criteria(&restaurant, &criteria, t(12, 0)));
        assert!(matches_price_tier(&restaurant, Some(PriceTier::Moderate)));
    }

    #[test]
    fn test_min_rating_is_inclusive() {
        let criteria = FilterCriteria::default()
            .with_cuisine("Italian")
            .with_min_rating(4.0);

        let below = create_test_restaurant("Italian", PriceTier::Moderate, 3.9);
        let at = create_test_restaurant("Italian", PriceTier::Moderate, 4.0);

        assert!(!matches_criteria(&below, &criteria, t(12, 0)));
        assert!(matches_criteria(&at, &criteria, t(12, 0)));
    }

    #[test]
    fn test_open_now_filter() {
        let criteria = FilterCriteria::default().open_now();
        let restaurant = create_test_restaurant("Italian", PriceTier::Moderate, 4.0);

        assert!(matches_criteria(&restaurant, &criteria, t(12, 0)));
        assert!(!matches_criteria(&restaurant, &criteria, t(23, 0)));
    }

    #[test]
    fn test_open_now_excludes_unknown_hours() {
        let criteria = FilterCriteria::default().open_now();
        let mut restaurant = create_test_restaurant("Italian", PriceTier::Moderate, 4.0);
        restaurant.closing_time = None;

        for hour in 0..24 {
            assert!(!matches_criteria(&restaurant, &criteria, t(hour, 0)));
        }

        // Without the flag, unknown hours do not matter
        assert!(matches_criteria(&restaurant, &FilterCriteria::default(), t(12, 0)));
    }
}
