use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer};
use restaurant_finder::config::{ProviderKind, Settings, StoreBackend};
use restaurant_finder::core::{Clock, Ranker, SystemClock};
use restaurant_finder::models::ErrorResponse;
use restaurant_finder::routes::{self, AppState};
use restaurant_finder::services::{
    CandidateProvider, FavoritesSet, HttpCandidateProvider, KeyValueStore, MemoryStore,
    PostgresStore, RedisStore, SearchService, StaticCandidateProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    });
    error::InternalError::from_response(err, response).into()
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    });
    error::InternalError::from_response(err, response).into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    tracing::error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn build_provider(settings: &Settings) -> std::io::Result<Arc<dyn CandidateProvider>> {
    let provider = &settings.provider;

    match provider.kind {
        ProviderKind::Http => {
            let base_url = provider
                .base_url
                .clone()
                .ok_or_else(|| startup_error("Invalid provider configuration", "provider.base_url is required"))?;
            let timeout = Duration::from_secs(provider.timeout_secs.unwrap_or(10));
            let ttl = Duration::from_secs(provider.cache_ttl_secs.unwrap_or(300));
            let capacity = provider.cache_capacity.unwrap_or(1000);

            let client = HttpCandidateProvider::new(base_url.clone(), timeout, capacity, ttl)
                .map_err(|e| startup_error("Failed to create candidate provider", e))?;

            info!("HTTP candidate provider at {} (cache: {} entries, TTL: {}s)", base_url, capacity, ttl.as_secs());
            Ok(Arc::new(client))
        }
        ProviderKind::Static => {
            let path = provider
                .data_file
                .clone()
                .ok_or_else(|| startup_error("Invalid provider configuration", "provider.data_file is required"))?;

            let client = StaticCandidateProvider::from_file(&path)
                .map_err(|e| startup_error("Failed to load candidate data", e))?;

            info!("Static candidate provider loaded from {}", path);
            Ok(Arc::new(client))
        }
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn KeyValueStore>> {
    let favorites = &settings.favorites;

    match favorites.backend {
        StoreBackend::Memory => {
            info!("Favorites kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => {
            let url = favorites
                .redis_url
                .as_deref()
                .ok_or_else(|| startup_error("Invalid favorites configuration", "favorites.redis_url is required"))?;

            let store = RedisStore::new(url, "restaurant-finder")
                .await
                .map_err(|e| startup_error("Failed to connect to Redis", e))?;

            info!("Favorites mirrored to Redis");
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let url = favorites
                .database_url
                .as_deref()
                .ok_or_else(|| startup_error("Invalid favorites configuration", "favorites.database_url is required"))?;

            let store = PostgresStore::from_settings(url, favorites.max_connections, None)
                .await
                .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!("Favorites mirrored to PostgreSQL");
            Ok(Arc::new(store))
        }
    }
}

fn build_clock(settings: &Settings) -> std::io::Result<Arc<dyn Clock>> {
    match settings.clock.utc_offset_minutes {
        Some(minutes) => {
            let clock = SystemClock::with_utc_offset_minutes(minutes)
                .map_err(|e| startup_error("Invalid clock configuration", e))?;
            info!("Open-now checks use UTC offset of {} minutes", minutes);
            Ok(Arc::new(clock))
        }
        None => Ok(Arc::new(SystemClock::local())),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the configured level applies
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Restaurant Finder service...");

    let provider = build_provider(&settings)?;
    let store = build_store(&settings).await?;
    let clock = build_clock(&settings)?;

    let favorites = Arc::new(FavoritesSet::load(store.clone(), settings.favorites.storage_key.clone()).await);
    let search = SearchService::new(provider, Ranker::new(clock), favorites.clone());

    let app_state = AppState {
        search,
        favorites,
        store,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
