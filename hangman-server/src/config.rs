use std::env;
use std::str::FromStr;
use std::time::Duration;

use hangman_core::{GameConfig, HangmanError};
use hangman_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error(transparent)]
    Game(#[from] HangmanError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// When set, sessions sync stats through this HTTP API instead of the
    /// local database
    pub stats_api_url: Option<String>,
    pub session_timeout_minutes: u64,
    pub cleanup_interval_seconds: u64,
    pub game: GameConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 3001)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            stats_api_url: env::var("STATS_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            session_timeout_minutes: parse_var("SESSION_TIMEOUT_MINUTES", 60)?,
            cleanup_interval_seconds: parse_var("CLEANUP_INTERVAL_SECONDS", 60)?,
            game: GameConfig::from_env()?,
        })
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes.saturating_mul(60))
    }

    /// At least one second
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
