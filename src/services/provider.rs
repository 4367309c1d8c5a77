use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use crate::models::{Coordinate, LocationQuery, Restaurant};

/// Errors that can occur when fetching candidates
///
/// Both variants are distinct from an empty candidate set.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Candidate provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Resolved search origin together with the raw candidates around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub origin: Coordinate,
    pub restaurants: Vec<Restaurant>,
}

/// Source of candidate restaurants
///
/// Address resolution happens behind this trait; callers only see the resolved origin.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn fetch_candidates(&self, query: &LocationQuery) -> Result<CandidateSet, ProviderError>;
}

/// HTTP candidate provider
///
/// Calls `GET {base_url}/restaurants?address=...` or `?lat=...&lng=...` and
/// expects `{"origin": {...}, "restaurants": [...]}`. Successful responses are
/// cached per query for the configured TTL.
pub struct HttpCandidateProvider {
    base_url: String,
    client: Client,
    cache: moka::future::Cache<String, CandidateSet>,
}

impl HttpCandidateProvider {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cache_capacity: u64,
        cache_ttl: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        let cache = moka::future::CacheBuilder::new(cache_capacity)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            base_url: base_url.into(),
            client,
            cache,
        })
    }

    async fn request(&self, query: &LocationQuery) -> Result<CandidateSet, ProviderError> {
        let url = format!("{}/restaurants", self.base_url.trim_end_matches('/'));

        let request = match query {
            LocationQuery::Address(address) => {
                self.client.get(&url).query(&[("address", address.as_str())])
            }
            LocationQuery::Coordinates(c) => self
                .client
                .get(&url)
                .query(&[("lat", c.latitude), ("lng", c.longitude)]),
        };

        tracing::debug!("Fetching candidates from {} for {}", url, query);

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("no results for {}", query));
            return Err(ProviderError::NotFound(message));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Candidate provider returned {} - {}", status, body);
            return Err(ProviderError::Unavailable(format!(
                "Failed to fetch candidates: {}",
                status
            )));
        }

        let json: Value = response.json().await?;
        parse_candidate_set(&json)
    }
}

/// Decode a provider response body
///
/// A missing or malformed origin fails the whole response. Individual restaurant
/// records that do not decode are skipped.
pub fn parse_candidate_set(json: &Value) -> Result<CandidateSet, ProviderError> {
    let origin = json
        .get("origin")
        .cloned()
        .ok_or_else(|| ProviderError::Unavailable("Missing origin in response".into()))
        .and_then(|origin| {
            serde_json::from_value::<Coordinate>(origin)
                .map_err(|e| ProviderError::Unavailable(format!("Invalid origin: {}", e)))
        })?;

    let documents = json
        .get("restaurants")
        .and_then(|r| r.as_array())
        .ok_or_else(|| ProviderError::Unavailable("Missing restaurants array".into()))?;

    let restaurants: Vec<Restaurant> = documents
        .iter()
        .filter_map(|doc| match serde_json::from_value(doc.clone()) {
            Ok(restaurant) => Some(restaurant),
            Err(e) => {
                tracing::debug!("Skipping malformed restaurant record: {}", e);
                None
            }
        })
        .collect();

    tracing::debug!(
        "Decoded {} of {} restaurant records",
        restaurants.len(),
        documents.len()
    );

    Ok(CandidateSet { origin, restaurants })
}

#[async_trait]
impl CandidateProvider for HttpCandidateProvider {
    async fn fetch_candidates(&self, query: &LocationQuery) -> Result<CandidateSet, ProviderError> {
        let key = query.to_string();

        if let Some(cached) = self.cache.get(&key).await {
            tracing::trace!("Candidate cache hit: {}", key);
            return Ok(cached);
        }

        let candidates = self.request(query).await?;
        self.cache.insert(key, candidates.clone()).await;

        Ok(candidates)
    }
}

/// Provider serving one fixed candidate set, for development and tests
///
/// Address queries get the stored origin; coordinate queries use their own
/// coordinate as the origin.
#[derive(Debug, Clone)]
pub struct StaticCandidateProvider {
    candidates: CandidateSet,
}

impl StaticCandidateProvider {
    pub fn new(candidates: CandidateSet) -> Self {
        Self { candidates }
    }

    /// Load a JSON file shaped like the HTTP provider's response
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Unavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let json: Value = serde_json::from_str(&contents).map_err(|e| {
            ProviderError::Unavailable(format!("Invalid JSON in {}: {}", path.display(), e))
        })?;

        Ok(Self::new(parse_candidate_set(&json)?))
    }
}

#[async_trait]
impl CandidateProvider for StaticCandidateProvider {
    async fn fetch_candidates(&self, query: &LocationQuery) -> Result<CandidateSet, ProviderError> {
        let origin = match query {
            LocationQuery::Address(_) => self.candidates.origin,
            LocationQuery::Coordinates(coordinate) => *coordinate,
        };

        Ok(CandidateSet {
            origin,
            restaurants: self.candidates.restaurants.clone(),
        })
    }
}
