use std::sync::Arc;

use crate::{config::Config, management::SessionManager, spotify::PlaylistAggregator};

/// Shared state for the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub playlists: Arc<PlaylistAggregator>,
    pub config: Arc<Config>,
}
