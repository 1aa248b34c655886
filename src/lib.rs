//! Spotify Playlist Merger backend library
//!
//! This library holds the server side of the playlist merger: it signs the user
//! in with Spotify through the OAuth2 authorization-code flow, keeps the issued
//! tokens on the server behind an opaque session cookie, refreshes them when
//! they run out and lists the user's playlists for the front-end.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the login flow and the JSON endpoints
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the core and the HTTP layer
//! - `management` - Token storage and the session lifecycle
//! - `server` - Router construction and the HTTP listener
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotmerge::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotmerge::Res<()> {
//!     config::load_env();
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config, None).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used on the startup path (configuration, binding the listener) where any
/// failure simply ends the program. The session core uses the typed
/// [`error::AuthError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Used for request-level events worth seeing in the server console, such as
/// a session being created or a token being refreshed.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// info!("Refreshing token for session {}", utils::redact(&session_id));
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Session {} logged in", utils::redact(&session_id));
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the startup path in `main`: a request handler must never
/// take the whole server down, so handlers report through [`warning!`] and a
/// typed error response instead.
///
/// # Example
///
/// ```
/// error!("Cannot bind {}: {}", addr, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: rejected authorization codes, failed
/// refreshes that end a session, upstream listing failures.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
