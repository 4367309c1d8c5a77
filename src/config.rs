use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::services::favorites::DEFAULT_FAVORITES_KEY;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub favorites: FavoritesSettings,
    #[serde(default)]
    pub clock: ClockSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Which candidate provider backs searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Http,
    #[default]
    Static,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    pub data_file: Option<String>,
    pub timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_capacity: Option<u64>,
}

/// Which key-value store mirrors the favorites set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
}

impl Default for FavoritesSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            storage_key: default_storage_key(),
            redis_url: None,
            database_url: None,
            max_connections: None,
        }
    }
}

fn default_storage_key() -> String { DEFAULT_FAVORITES_KEY.to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockSettings {
    /// Fixed offset from UTC for open-now checks; host local time when unset
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RESTAURANT_FINDER_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RESTAURANT_FINDER__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RESTAURANT_FINDER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Let the conventional DATABASE_URL and REDIS_URL variables fill in store URLs
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings.clone());

    if settings.get_string("favorites.database_url").is_err() {
        if let Ok(url) = env::var("DATABASE_URL") {
            builder = builder.set_override("favorites.database_url", url)?;
        }
    }
    if settings.get_string("favorites.redis_url").is_err() {
        if let Ok(url) = env::var("REDIS_URL") {
            builder = builder.set_override("favorites.redis_url", url)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_defaults() {
        let favorites = FavoritesSettings::default();
        assert_eq!(favorites.backend, StoreBackend::Memory);
        assert_eq!(favorites.storage_key, "restaurant-finder-favorites");

        let server = ServerSettings::default();
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[provider]
kind = "http"
base_url = "http://localhost:4000/api"
cache_ttl_secs = 30

[favorites]
backend = "redis"
redis_url = "redis://127.0.0.1:6379"

[clock]
utc_offset_minutes = -300
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.provider.kind, ProviderKind::Http);
        assert_eq!(settings.provider.cache_ttl_secs, Some(30));
        assert_eq!(settings.favorites.backend, StoreBackend::Redis);
        assert_eq!(settings.favorites.storage_key, DEFAULT_FAVORITES_KEY);
        assert_eq!(settings.clock.utc_offset_minutes, Some(-300));
        assert_eq!(settings.logging.format, "json");
    }
}
