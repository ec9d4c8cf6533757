//! Configuration management for the tophits service.
//!
//! Configuration values come from environment variables, optionally seeded
//! from `.env` files. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/tophits/.env`)
//! 4. Application defaults (where applicable)
//!
//! Everything is read once into a [`Config`] that is handed to the server,
//! instead of querying the environment from deep inside request handlers.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";

/// Permissions requested on the consent screen.
pub const SCOPE: &str =
    "user-read-private user-read-email user-library-read user-top-read playlist-modify-public";

/// Loads environment variables from `.env` files.
///
/// The `.env` of the working directory is read first, then the one in the
/// platform-specific local data directory under `tophits/.env`:
/// - Linux: `~/.local/share/tophits/.env`
/// - macOS: `~/Library/Application Support/tophits/.env`
/// - Windows: `%LOCALAPPDATA%/tophits/.env`
///
/// `dotenv` never overrides variables that are already set, so earlier
/// sources win. Missing files are not an error; unreadable ones are.
pub async fn load_env() -> Result<()> {
    let _ = dotenv::dotenv();

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tophits/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Everything the service needs to talk to Spotify and to serve requests.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub market: String,
    pub popularity_threshold: u32,
    /// Seconds shaved off a token's lifetime when judging freshness.
    pub token_skew: u64,
    pub http_timeout: Duration,
    /// Seconds a session may go unused before it is dropped.
    pub session_idle_secs: u64,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when a required variable is missing or
    /// empty, or when a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            market: or_default("TOPHITS_MARKET", "US"),
            popularity_threshold: parse_or(
                get("TOPHITS_POPULARITY_THRESHOLD"),
                "TOPHITS_POPULARITY_THRESHOLD",
                75,
            )?,
            token_skew: parse_or(
                get("TOPHITS_TOKEN_SKEW_SECS"),
                "TOPHITS_TOKEN_SKEW_SECS",
                5,
            )?,
            http_timeout: Duration::from_secs(parse_or(
                get("TOPHITS_HTTP_TIMEOUT_SECS"),
                "TOPHITS_HTTP_TIMEOUT_SECS",
                10,
            )?),
            session_idle_secs: parse_or(
                get("TOPHITS_SESSION_IDLE_SECS"),
                "TOPHITS_SESSION_IDLE_SECS",
                86_400,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
