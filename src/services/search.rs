use std::sync::Arc;
use thiserror::Error;
use crate::core::Ranker;
use crate::models::{Coordinate, FilterCriteria, InputError, LocationQuery, RankedRestaurant, TimeOfDay};
use crate::services::favorites::FavoritesSet;
use crate::services::provider::{CandidateProvider, ProviderError};

/// Errors that fail a whole search request
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Ranked results of one search
#[derive(Debug)]
pub struct SearchOutcome {
    pub origin: Coordinate,
    /// Clock reading the open-now filter was evaluated against
    pub evaluated_at: TimeOfDay,
    /// Candidates returned by the provider, before filtering
    pub total_candidates: usize,
    pub results: Vec<RankedRestaurant>,
}

/// Search pipeline: provider fetch, ranking, optional favorites view
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn CandidateProvider>,
    ranker: Ranker,
    favorites: Arc<FavoritesSet>,
}

impl SearchService {
    pub fn new(
        provider: Arc<dyn CandidateProvider>,
        ranker: Ranker,
        favorites: Arc<FavoritesSet>,
    ) -> Self {
        Self {
            provider,
            ranker,
            favorites,
        }
    }

    pub fn favorites(&self) -> &Arc<FavoritesSet> {
        &self.favorites
    }

    /// Run one search
    ///
    /// Criteria and location are validated before the provider is called. A
    /// provider failure fails the request; it is never reported as zero results.
    pub async fn search(
        &self,
        query: &LocationQuery,
        criteria: &FilterCriteria,
        favorites_only: bool,
    ) -> Result<SearchOutcome, SearchError> {
        query.validate()?;
        criteria.validate()?;

        let candidates = self.provider.fetch_candidates(query).await.map_err(|e| {
            tracing::error!("Candidate provider failed for {}: {}", query, e);
            e
        })?;

        tracing::debug!("Provider returned {} candidates for {}", candidates.restaurants.len(), query);

        let origin = candidates.origin;
        let ranked = self.ranker.rank(&origin, candidates.restaurants, criteria);

        let results = if favorites_only {
            self.favorites.filter_ranked(ranked.results)
        } else {
            ranked.results
        };

        tracing::info!(
            "Search {} returned {} of {} candidates (filters: {}, favorites only: {})",
            query,
            results.len(),
            ranked.total_candidates,
            criteria.active_count(),
            favorites_only
        );

        Ok(SearchOutcome {
            origin,
            evaluated_at: ranked.evaluated_at,
            total_candidates: ranked.total_candidates,
            results,
        })
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}
