use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{AppState, cookies};
use crate::{error::AuthError, types::StatusResponse, warning};

pub async fn status(State(state): State<AppState>, jar: CookieJar) -> Json<StatusResponse> {
    let logged_in = match cookies::session_id(&jar) {
        Some(session_id) => state.sessions.is_logged_in(&session_id).await,
        None => false,
    };

    Json(StatusResponse { logged_in })
}

/// Lists every playlist of the logged-in user.
///
/// A missing or dead session answers 401 and drops the cookie; a failed
/// listing answers 502 and leaves the session alone so the client can retry.
pub async fn playlists(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(session_id) = cookies::session_id(&jar) else {
        return AuthError::Unauthenticated.into_response();
    };

    let access_token = match state.sessions.get_valid_token(&session_id).await {
        Ok(token) => token,
        Err(e) if e.requires_login() => {
            return (cookies::clear_session_cookie(jar), e).into_response();
        }
        Err(e) => return e.into_response(),
    };

    match state.playlists.list_all_playlists(&access_token).await {
        Ok(playlists) => Json(playlists).into_response(),
        Err(e) => {
            warning!("Playlist listing failed: {}", e);
            e.into_response()
        }
    }
}
