//! Application configuration loaded from environment variables.

use std::env;

use bbs_core::{ConfigError, OriginGate};

#[cfg(feature = "dynamodb")]
use bbs_infra::DynamoConfig;

/// Where posts are kept.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory,
    #[cfg(feature = "dynamodb")]
    DynamoDb(DynamoConfig),
}

/// Application configuration. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gate: OriginGate,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dev_mode = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development"));
        let gate = OriginGate::new(lookup("REFERER"), dev_mode)?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            gate,
            store: Self::parse_store(&lookup)?,
        })
    }

    /// POST_STORE=memory|dynamodb; defaults to DynamoDB when it is compiled in.
    fn parse_store(lookup: &impl Fn(&str) -> Option<String>) -> Result<StoreConfig, ConfigError> {
        let kind = lookup("POST_STORE").map(|v| v.to_lowercase());
        match kind.as_deref() {
            Some("memory") => Ok(StoreConfig::Memory),
            #[cfg(feature = "dynamodb")]
            None | Some("dynamodb") => Ok(StoreConfig::DynamoDb(DynamoConfig::from_lookup(lookup))),
            #[cfg(not(feature = "dynamodb"))]
            None => Ok(StoreConfig::Memory),
            Some(other) => Err(ConfigError::Invalid {
                key: "POST_STORE",
                value: other.to_string(),
            }),
        }
    }
}
