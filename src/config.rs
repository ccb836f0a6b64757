//! Server configuration read from the process environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite::memory:` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `LOG_LEVEL` | `info` |
//! | `CORS_ALLOW_ANY` | `true` |

use std::fmt;

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cors_allow_any: true,
        }
    }
}

/// A variable was set but could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort(value) => write!(f, "PORT must be a number between 0 and 65535, got '{value}'"),
            Self::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Read the configuration from environment variables.
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `PORT` or `CORS_ALLOW_ANY` is set to an
    /// unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match read("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort(value))?,
            None => defaults.port,
        };
        let cors_allow_any = match read("CORS_ALLOW_ANY") {
            Some(value) => parse_flag("CORS_ALLOW_ANY", value)?,
            None => defaults.cors_allow_any,
        };

        Ok(Self {
            database_url: read("DATABASE_URL").unwrap_or(defaults.database_url),
            host: read("HOST").unwrap_or(defaults.host),
            port,
            log_level: read("LOG_LEVEL").unwrap_or(defaults.log_level),
            cors_allow_any,
        })
    }

    /// Returns the socket address to bind to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}
