//! Configuration management for the playlist merger backend.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Everything the server needs at runtime ends up in a
//! single [`Config`] value that is built once at startup and shared with the
//! session manager, the Spotify clients and the HTTP layer.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! Missing Spotify credentials are not a startup failure. The server still comes
//! up (so `/health` and the static front-end keep working) and every auth attempt
//! reports a configuration error until the credentials are provided.

use std::{env, path::PathBuf, time::Duration};

use crate::Res;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/callback";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private user-read-private user-read-email";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration of the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub frontend_url: String,
    pub server_addr: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
    /// Forces Spotify to show the consent dialog even if the user already approved.
    pub show_dialog: bool,
    pub cookie_secure: bool,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_TIMEOUT_SECS` or `COOKIE_SECURE` are set to
    /// values that cannot be parsed. Missing credentials are not an error here.
    pub fn from_env() -> Res<Self> {
        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| format!("Invalid HTTP_TIMEOUT_SECS '{}': {}", raw, e))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            client_id: spotify_client_id(),
            client_secret: spotify_client_secret(),
            redirect_uri: var_or("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            frontend_url: var_or("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            server_addr: server_addr(),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: var_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            scope: var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            show_dialog: true,
            cookie_secure: parse_flag("COOKIE_SECURE")?,
            http_timeout,
        })
    }

    /// Configuration pointing every Spotify endpoint at `base`.
    ///
    /// For tests that stand up a fake provider on a local port; integration
    /// tests get it through the `test-util` feature.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_spotify_base(base: &str) -> Self {
        Self {
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            auth_url: format!("{}/authorize", base),
            token_url: format!("{}/api/token", base),
            api_url: format!("{}/v1", base),
            scope: DEFAULT_SCOPE.to_string(),
            show_dialog: true,
            cookie_secure: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory wins; otherwise the file under the
/// platform-specific local data directory (`spotmerge/.env`) is tried.
/// Neither file is required: a deployment may configure everything through
/// real environment variables.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotmerge/.env`
/// - macOS: `~/Library/Application Support/spotmerge/.env`
/// - Windows: `%LOCALAPPDATA%/spotmerge/.env`
///
/// Returns the path that was loaded, if any.
pub fn load_env() -> Option<PathBuf> {
    if let Ok(path) = dotenv::dotenv() {
        return Some(path);
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotmerge/.env");
    dotenv::from_path(&path).ok().map(|_| path)
}

/// Returns the address the HTTP server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8000`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID, if one is configured.
///
/// Reads `SPOTIFY_CLIENT_ID`. Blank values count as missing.
pub fn spotify_client_id() -> Option<String> {
    non_blank("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret, if one is configured.
///
/// Reads `SPOTIFY_CLIENT_SECRET`. Blank values count as missing.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Option<String> {
    non_blank("SPOTIFY_CLIENT_SECRET")
}

fn var_or(key: &str, default: &str) -> String {
    non_blank(key).unwrap_or_else(|| default.to_string())
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(key: &str) -> Res<bool> {
    match non_blank(key) {
        None => Ok(false),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid {} '{}': expected true or false", key, v).into()),
        },
    }
}
