use std::{net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    Res, api,
    config::Config,
    info,
    management::{MemoryTokenStore, SessionManager, TokenStore},
    spotify::{OAuthClient, PlaylistAggregator},
    utils, warning,
};

/// Wires the session core together on top of the given token store.
pub fn build_state(config: Config, store: Arc<dyn TokenStore>) -> Res<api::AppState> {
    let http = Client::builder().timeout(config.http_timeout).build()?;

    let oauth = OAuthClient::new(config.clone(), http.clone());
    let sessions = SessionManager::new(store, oauth);
    let playlists = PlaylistAggregator::new(config.api_url.clone(), http);

    Ok(api::AppState {
        sessions: Arc::new(sessions),
        playlists: Arc::new(playlists),
        config: Arc::new(config),
    })
}

/// All routes of the backend, optionally serving the front-end from `static_dir`.
pub fn router(state: api::AppState, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/api/status", get(api::status))
        .route("/api/playlists", get(api::playlists))
        .route("/api/logout", get(api::logout));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = cors_layer(&state.config.frontend_url);
    app.layer(cors).with_state(state)
}

/// CORS for the front-end origin, with cookies allowed.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_credentials(true);

    let origin = url::Url::parse(frontend_url)
        .ok()
        .map(|u| u.origin().ascii_serialization())
        .and_then(|o| HeaderValue::from_str(&o).ok());

    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => {
            warning!("FRONTEND_URL '{}' is not a valid URL, CORS disabled", frontend_url);
            layer
        }
    }
}

/// Binds `config.server_addr` and serves until the process is stopped.
pub async fn start_api_server(config: Config, static_dir: Option<PathBuf>) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| format!("Failed to parse server address '{}': {}", config.server_addr, e))?;

    let credentials_ok = config
        .client_id
        .as_deref()
        .zip(config.client_secret.as_deref())
        .is_some_and(|(id, secret)| !utils::is_placeholder(id) && !utils::is_placeholder(secret));
    if !credentials_ok {
        warning!(
            "SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET are not configured; logins will fail until they are set."
        );
    }

    let state = build_state(config, Arc::new(MemoryTokenStore::new()))?;
    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Sessions are kept in memory and are lost when the server restarts.");
    axum::serve(listener, app).await?;
    Ok(())
}
