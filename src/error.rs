//! Error taxonomy of the session core.
//!
//! Every fallible operation of the OAuth client, the session manager and the
//! playlist aggregator returns [`AuthError`]. The variants are deliberately
//! coarse: each one maps to exactly one user-visible outcome in the HTTP layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Client credentials are missing or still the template placeholders.
    #[error("Server misconfiguration: {0}")]
    Configuration(String),

    /// Spotify rejected an authorization code or a refresh token.
    #[error("Authentication failed: {0}")]
    UpstreamAuth(String),

    /// No session exists for the presented identifier.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The session existed but its token could not be refreshed.
    #[error("Session expired")]
    SessionExpired,

    /// A Spotify Web API data call failed.
    #[error("Spotify API error ({status}): {message}")]
    UpstreamApi { status: u16, message: String },
}

impl AuthError {
    /// True for errors that mean "log in again".
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionExpired)
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;
