use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Connections older than this are closed on release; `None` keeps them forever
    pub max_lifetime_secs: Option<u64>,
    /// Idle connections above `min_connections` are reaped after this long
    pub idle_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub enable_cors: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY must be set in {0:?} mode")]
    MissingApiKey(Environment),
    #[error("DATABASE_URL must not be empty")]
    MissingDatabaseUrl,
    #[error("database min_connections ({min}) exceeds max_connections ({max})")]
    PoolBounds { min: u32, max: u32 },
}

impl DatabaseConfig {
    /// Private in-memory store on a single pinned connection. Every extra
    /// connection to `sqlite::memory:` would open a separate, empty database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            max_lifetime_secs: None,
            idle_timeout_secs: None,
            acquire_timeout_secs: 5,
        }
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        self.max_lifetime_secs.map(Duration::from_secs)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// In-memory configuration for tests and local experiments
    pub fn in_memory(api_key: &str) -> Self {
        let mut config = Self::development();
        config.database = DatabaseConfig::in_memory();
        config.security.api_key = api_key.to_string();
        config
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply per-key overrides from `lookup`. A value that does not parse
    /// keeps the current setting.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_MIN_CONNECTIONS") {
            self.database.min_connections = v.parse().unwrap_or(self.database.min_connections);
        }
        if let Some(v) = lookup("DATABASE_MAX_LIFETIME_SECS") {
            self.database.max_lifetime_secs = v.parse().ok().or(self.database.max_lifetime_secs);
        }
        if let Some(v) = lookup("DATABASE_IDLE_TIMEOUT_SECS") {
            self.database.idle_timeout_secs = v.parse().ok().or(self.database.idle_timeout_secs);
        }
        if let Some(v) = lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // API overrides
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Some(v) = lookup("LOG_FILTER") {
            self.api.log_filter = v;
        }

        // Security overrides
        if let Some(v) = lookup("API_KEY") {
            self.security.api_key = v;
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    /// Reject configurations the server must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey(self.environment));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::PoolBounds {
                min: self.database.min_connections,
                max: self.database.max_connections,
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite://categories.db".to_string(),
                max_connections: 20,
                min_connections: 5,
                max_lifetime_secs: Some(60 * 60),
                idle_timeout_secs: Some(10),
                acquire_timeout_secs: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 1024 * 1024, // 1MB
                log_filter: "category_api=debug,tower_http=debug".to_string(),
            },
            security: SecurityConfig {
                api_key: "RAHASIA".to_string(),
                enable_cors: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite://categories.db".to_string(),
                max_connections: 20,
                min_connections: 5,
                max_lifetime_secs: Some(60 * 60),
                idle_timeout_secs: Some(10),
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                max_request_size_bytes: 64 * 1024, // 64KB
                log_filter: "category_api=info,tower_http=info".to_string(),
            },
            security: SecurityConfig {
                // Must come from API_KEY
                api_key: String::new(),
                enable_cors: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.api_key, "RAHASIA");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.max_lifetime(), Some(Duration::from_secs(3600)));
        assert_eq!(config.database.idle_timeout(), Some(Duration::from_secs(10)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_api_key() {
        let config = AppConfig::production();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey(Environment::Production))
        ));
    }

    #[test]
    fn test_pool_bounds_checked() {
        let mut config = AppConfig::development();
        config.database.min_connections = 30;
        assert!(matches!(config.validate(), Err(ConfigError::PoolBounds { min: 30, max: 20 })));
    }

    #[test]
    fn test_in_memory_config_pins_one_connection() {
        let config = AppConfig::in_memory("secret");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.idle_timeout(), None);
        assert_eq!(config.security.api_key, "secret");
    }

    #[test]
    fn test_overrides_apply_and_bad_values_keep_defaults() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("PORT", "9090"),
            ("API_KEY", "from-env"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
            ("DATABASE_MAX_LIFETIME_SECS", "forever"),
            ("DATABASE_IDLE_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::development()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.security.api_key, "from-env");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.max_lifetime_secs, Some(3600));
        assert_eq!(config.database.idle_timeout_secs, Some(30));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let json = serde_json::to_string(&AppConfig::development()).unwrap();
        assert!(!json.contains("RAHASIA"));
    }
}
