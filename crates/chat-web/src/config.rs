//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderName;
use database::validation::validate_username;
use database::ValidationError;

/// Default header carrying the authenticated user name.
pub const DEFAULT_USER_HEADER: &str = "x-forwarded-user";

/// Chat web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Header set by the fronting auth proxy.
    pub user_header: HeaderName,
    /// User assumed when the header is absent.
    pub default_user: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CHAT_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `CHATBOT_DB` | SQLite database URL | `sqlite:chatbot.db?mode=rwc` |
    /// | `CHAT_STATIC_DIR` | Stylesheet directory | `static` |
    /// | `CHAT_USER_HEADER` | Header naming the signed-in user | `x-forwarded-user` |
    /// | `CHAT_DEFAULT_USER` | User when the header is missing | (none, reject) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CHAT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("CHATBOT_DB")
            .unwrap_or_else(|_| "sqlite:chatbot.db?mode=rwc".to_string());

        let static_dir = env::var("CHAT_STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let user_header = env::var("CHAT_USER_HEADER")
            .unwrap_or_else(|_| DEFAULT_USER_HEADER.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidUserHeader)?;

        let default_user = match env::var("CHAT_DEFAULT_USER") {
            Ok(name) if !name.trim().is_empty() => {
                let name = name.trim().to_string();
                validate_username(&name)?;
                Some(name)
            }
            _ => None,
        };

        Ok(Self {
            addr,
            database_url,
            static_dir,
            user_header,
            default_user,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CHAT_ADDR format")]
    InvalidAddr,

    #[error("CHAT_USER_HEADER is not a valid header name")]
    InvalidUserHeader,

    #[error("Invalid CHAT_DEFAULT_USER: {0}")]
    InvalidDefaultUser(#[from] ValidationError),
}
