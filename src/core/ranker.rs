use std::sync::Arc;
use crate::models::{Coordinate, FilterCriteria, RankedRestaurant, Restaurant, TimeOfDay};
use crate::core::{
    distance::distance_km,
    filters::matches_criteria,
    hours::{Clock, SystemClock},
};

/// Result of ranking against a single clock reading
#[derive(Debug)]
pub struct RankResult {
    pub results: Vec<RankedRestaurant>,
    pub total_candidates: usize,
    pub evaluated_at: TimeOfDay,
}

/// Ranking orchestrator
///
/// # Pipeline Stages
/// 1. Predicate filtering (cuisine, price tier, rating, open now)
/// 2. Straight-line distance from the origin
/// 3. Stable ascending sort by distance
///
/// No truncation happens here; "top N" belongs to the caller.
#[derive(Clone)]
pub struct Ranker {
    clock: Arc<dyn Clock>,
}

impl Ranker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock::local()))
    }

    /// Current time of day according to the configured clock
    pub fn now(&self) -> TimeOfDay {
        self.clock.now()
    }

    /// Read the clock once and rank against that reading
    pub fn rank(
        &self,
        origin: &Coordinate,
        candidates: Vec<Restaurant>,
        criteria: &FilterCriteria,
    ) -> RankResult {
        let now = self.clock.now();
        let total_candidates = candidates.len();
        let results = rank(origin, candidates, criteria, now);

        RankResult {
            results,
            total_candidates,
            evaluated_at: now,
        }
    }
}

impl std::fmt::Debug for Ranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranker").finish_non_exhaustive()
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

/// Filter candidates and order them by ascending distance from `origin`
///
/// Equal distances keep their input order, so identical input always yields
/// identical output. Empty input, or input where nothing matches, gives an
/// empty result.
pub fn rank(
    origin: &Coordinate,
    candidates: Vec<Restaurant>,
    criteria: &FilterCriteria,
    now: TimeOfDay,
) -> Vec<RankedRestaurant> {
    let total = candidates.len();

    let mut ranked: Vec<RankedRestaurant> = candidates
        .into_iter()
        .filter(|restaurant| matches_criteria(restaurant, criteria, now))
        .map(|restaurant| {
            let distance_km = distance_km(origin, &restaurant.coordinate);
            RankedRestaurant {
                restaurant,
                distance_km,
            }
        })
        .collect();

    // sort_by is stable; total_cmp keeps NaN distances ordered (last)
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    tracing::debug!(
        "Ranked {} of {} candidates (active filters: {})",
        ranked.len(),
        total,
        criteria.active_count()
    );

    ranked
}
