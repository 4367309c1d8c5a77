// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod hours;
pub mod ranker;

pub use distance::{distance_km, haversine_distance};
pub use filters::{is_open_now, matches_criteria, matches_cuisine, matches_price_tier, meets_min_rating};
pub use hours::{is_open, Clock, FixedClock, SystemClock};
pub use ranker::{rank, RankResult, Ranker};
