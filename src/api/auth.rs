use axum::{
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::{AppState, cookies};
use crate::{error::AuthError, warning};

/// `302 Found` to `location`.
pub(super) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

pub async fn login(State(state): State<AppState>) -> Result<Response, AuthError> {
    let url = state.sessions.login()?;
    Ok(found(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Response), AuthError> {
    if let Some(error) = params.error {
        warning!("Spotify returned an authorization error: {}", error);
        return Err(AuthError::UpstreamAuth(error));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::UpstreamAuth("Missing authorization code".to_string()))?;

    let session_id = state.sessions.complete_login(&code).await?;
    let jar = jar.add(cookies::session_cookie(
        session_id,
        state.config.cookie_secure,
    ));

    Ok((jar, found(&state.config.frontend_url)))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Response) {
    if let Some(session_id) = cookies::session_id(&jar) {
        state.sessions.logout(&session_id).await;
    }

    (
        cookies::clear_session_cookie(jar),
        found(&state.config.frontend_url),
    )
}
