//! # API Module
//!
//! HTTP handlers of the merger backend. They translate requests into calls on
//! [`crate::management::SessionManager`] and
//! [`crate::spotify::PlaylistAggregator`] and carry the session identifier in
//! an `HttpOnly` cookie. The identifier never appears in a URL or a response
//! body.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /login`, redirects to the Spotify consent page
//! - [`callback`] - `GET /callback`, exchanges the code, sets the session
//!   cookie and redirects to the front-end
//! - [`logout`] - `GET /api/logout`, ends the session and redirects to the
//!   front-end
//!
//! ### Data
//!
//! - [`status`] - `GET /api/status`, `{ "logged_in": bool }`
//! - [`playlists`] - `GET /api/playlists`, the user's playlists as JSON
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, status and version
//!
//! ## Error Responses
//!
//! Failures are rendered from [`crate::error::AuthError`] as
//! `{ "error": "<message>" }`:
//!
//! | error | status |
//! |---|---|
//! | `Configuration` | 503 |
//! | `UpstreamAuth` | 400 |
//! | `Unauthenticated`, `SessionExpired` | 401 |
//! | `UpstreamApi` | 502 |

mod auth;
mod cookies;
mod error;
mod health;
mod playlists;
mod state;

pub use auth::{callback, login, logout};
pub use cookies::SESSION_COOKIE;
pub use health::health;
pub use playlists::{playlists, status};
pub use state::AppState;
