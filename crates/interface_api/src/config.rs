//! API configuration
//!
//! Layered: compiled-in defaults, then `API_`-prefixed environment
//! variables. A bare `DATABASE_URL` is honoured as well since deployment
//! platforms conventionally set it without a prefix.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server bind host
    pub host: String,
    /// Server bind port
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/strata".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration, layering environment variables over defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut cfg: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database_url = url;
        }
        Ok(cfg)
    }

    /// Returns the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
