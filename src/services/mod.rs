// Service exports
pub mod cache;
pub mod favorites;
pub mod postgres;
pub mod provider;
pub mod search;
pub mod store;

pub use cache::RedisStore;
pub use favorites::{FavoritesSet, ToggleOutcome, DEFAULT_FAVORITES_KEY};
pub use postgres::PostgresStore;
pub use provider::{CandidateProvider, CandidateSet, HttpCandidateProvider, ProviderError, StaticCandidateProvider};
pub use search::{SearchError, SearchOutcome, SearchService};
pub use store::{KeyValueStore, MemoryStore, StoreError};
