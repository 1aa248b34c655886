use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    error::{AuthError, AuthResult},
    info,
    management::TokenStore,
    spotify::OAuthClient,
    success,
    utils::{self, redact},
    warning,
};

/// Tokens expiring within this many seconds are refreshed before use, so an
/// in-flight Web API call does not race the expiry.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

/// Owns the lifecycle of every browser session.
///
/// A session is created by a successful code exchange, lives in the
/// [`TokenStore`] while its token is valid or refreshable, and is removed on
/// logout or when a refresh fails. Refreshes are serialized per session: a
/// request that finds the token expiring waits for any refresh already
/// running for the same session and reuses its result.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthClient) -> Self {
        Self {
            store,
            oauth,
            refresh_locks: DashMap::new(),
        }
    }

    /// Where to send the browser to start a login. No state changes.
    pub fn login(&self) -> AuthResult<String> {
        self.oauth.authorize_url()
    }

    /// Finishes the OAuth dance and opens a new session.
    ///
    /// Returns the freshly generated session identifier; no session is
    /// created when the exchange fails.
    pub async fn complete_login(&self, code: &str) -> AuthResult<String> {
        let token = self.oauth.exchange_code(code).await.inspect_err(|e| {
            warning!("Token exchange failed: {}", e);
        })?;

        let mut session_id = utils::generate_session_id();
        while self.store.get(&session_id).await.is_some() {
            session_id = utils::generate_session_id();
        }

        self.store.put(&session_id, token).await;
        success!("Session {} logged in", redact(&session_id));
        Ok(session_id)
    }

    /// Returns a usable access token for the session, refreshing it if needed.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthenticated`] when there is no such session
    /// - [`AuthError::SessionExpired`] when the token could not be renewed;
    ///   the session is gone afterwards
    /// - [`AuthError::Configuration`] when the credentials needed to refresh
    ///   are not configured; the session is kept
    pub async fn get_valid_token(&self, session_id: &str) -> AuthResult<String> {
        let token = self
            .store
            .get(session_id)
            .await
            .ok_or(AuthError::Unauthenticated)?;
        if !token.is_expired(EXPIRY_MARGIN_SECS) {
            return Ok(token.access_token);
        }

        let lock = self.refresh_lock(session_id);
        let guard = lock.lock().await;
        let result = self.refresh_locked(session_id).await;
        drop(guard);

        self.release_lock(session_id, &lock);
        result
    }

    /// Refresh step of [`Self::get_valid_token`]; runs under the session's lock.
    async fn refresh_locked(&self, session_id: &str) -> AuthResult<String> {
        // state may have moved on while we waited for the lock
        let Some(token) = self.store.get(session_id).await else {
            return Err(AuthError::SessionExpired);
        };
        if !token.is_expired(EXPIRY_MARGIN_SECS) {
            return Ok(token.access_token);
        }

        let Some(refresh_token) = token.refresh_token else {
            warning!(
                "Session {} has an expired token and nothing to refresh it with",
                redact(session_id)
            );
            self.expire(session_id).await;
            return Err(AuthError::SessionExpired);
        };

        info!("Refreshing token for session {}", redact(session_id));
        match self.oauth.refresh(&refresh_token).await {
            Ok(fresh) => {
                let access_token = fresh.access_token.clone();
                self.store.put(session_id, fresh).await;
                Ok(access_token)
            }
            Err(e @ AuthError::Configuration(_)) => Err(e),
            Err(e) => {
                warning!("Refresh failed for session {}: {}", redact(session_id), e);
                self.expire(session_id).await;
                Err(AuthError::SessionExpired)
            }
        }
    }

    /// Ends the session. Unknown ids are ignored.
    ///
    /// Waits for a refresh running on the same session, so the refreshed
    /// token cannot be written back after the session is gone.
    pub async fn logout(&self, session_id: &str) {
        let lock = self.refresh_lock(session_id);
        let guard = lock.lock().await;
        self.store.delete(session_id).await;
        drop(guard);

        self.refresh_locks.remove(session_id);
        info!("Session {} logged out", redact(session_id));
    }

    /// Cheap presence check; never refreshes.
    pub async fn is_logged_in(&self, session_id: &str) -> bool {
        self.store.get(session_id).await.is_some()
    }

    /// Deletes the session. Callers hold the session's refresh lock.
    async fn expire(&self, session_id: &str) {
        self.store.delete(session_id).await;
        self.refresh_locks.remove(session_id);
    }

    fn refresh_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry(session_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Drops the lock entry unless another request is still waiting on it.
    fn release_lock(&self, session_id: &str, lock: &Arc<Mutex<()>>) {
        // one reference in the map, one held by the caller
        self.refresh_locks.remove_if(session_id, |_, held| {
            Arc::ptr_eq(held, lock) && Arc::strong_count(held) <= 2
        });
    }

    /// Number of sessions that currently have a refresh lock allocated.
    pub fn refresh_lock_count(&self) -> usize {
        self.refresh_locks.len()
    }
}
