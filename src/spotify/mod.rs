//! # Spotify Integration Module
//!
//! This module is the integration layer between the merger backend and
//! Spotify's two services: the accounts service (OAuth2) and the Web API.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! Session lifecycle (management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization-code flow, refresh)
//!     └── Playlist listing (pagination, projection)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! [`auth`] - [`auth::OAuthClient`] builds the consent URL, exchanges the
//! authorization code and refreshes access tokens. It uses the confidential
//! client flow: the client secret is sent with HTTP Basic auth and never
//! leaves the server.
//!
//! [`playlists`] - [`playlists::PlaylistAggregator`] walks `GET /me/playlists`
//! page by page and projects each entry onto a
//! [`crate::types::PlaylistSummary`].
//!
//! ## Error Handling
//!
//! Neither client swallows upstream failures. Token endpoint failures come
//! back as [`crate::error::AuthError::UpstreamAuth`], Web API failures as
//! [`crate::error::AuthError::UpstreamApi`]. Deciding what a failure means for
//! the session is left to [`crate::management::SessionManager`].
//!
//! ### Rate Limiting
//! - `429 Too Many Requests` on a listing page is retried after the
//!   `Retry-After` delay when that delay is at most 120 seconds
//! - Longer delays surface as an API error so the request does not hang
//!
//! ## API Coverage
//!
//! - `GET /authorize` - user consent (browser redirect only)
//! - `POST /api/token` - code exchange and refresh
//! - `GET /me/playlists` - the user's playlists, paginated

pub mod auth;
pub mod playlists;

pub use auth::OAuthClient;
pub use playlists::PlaylistAggregator;
