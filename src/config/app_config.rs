use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Directory and user persistence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Listing cache
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            max_connections: 10,
            min_connections: 1,
            run_migrations: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: 3600,
            max_capacity: 10_000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_minutes: 5,
            refresh_token_hours: 24,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Fills unset connection settings from the conventional variables
    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if self.storage.database_url.is_none() {
            self.storage.database_url = lookup("DATABASE_URL");
        }

        if self.cache.redis_url.is_none() {
            self.cache.redis_url = lookup("REDIS_URL");
        }

        if self.auth.jwt_secret.is_none() {
            self.auth.jwt_secret = lookup("JWT_SECRET");
        }
    }
}
