use std::env;
use std::str::FromStr;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::auth::token::DEFAULT_TOKEN_TTL_HOURS;

const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which `UserStore`/`TaskStore` pair the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

pub struct Config {
    pub storage: StorageBackend,
    /// `None` only when running on the memory backend.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("storage", &self.storage)
            .field("database_max_connections", &self.database_max_connections)
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = parsed("STORAGE", StorageBackend::Postgres)?;

        let database_url = match (storage, non_empty("DATABASE_URL")) {
            (StorageBackend::Postgres, None) => return Err(ConfigError::Missing("DATABASE_URL")),
            (_, url) => url,
        };

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration_hours: i64 = parsed("JWT_EXPIRATION_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        let representable = Duration::try_hours(jwt_expiration_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .is_some();
        if jwt_expiration_hours <= 0 || !representable {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_HOURS",
                value: jwt_expiration_hours.to_string(),
            });
        }

        Ok(Self {
            storage,
            database_url,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
