use chrono::Utc;
use reqwest::{Client, Response};
use url::Url;

use crate::{
    config::Config,
    error::{AuthError, AuthResult},
    types::{Token, TokenErrorResponse, TokenResponse},
    utils,
};

/// Client for the Spotify accounts service.
///
/// Wraps the three calls of the authorization-code flow: building the
/// authorize URL, exchanging the one-shot code and refreshing an access
/// token. It never stores tokens itself.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: Config,
    http: Client,
}

impl OAuthClient {
    pub fn new(config: Config, http: Client) -> Self {
        Self { config, http }
    }

    /// Returns the client id and secret, rejecting missing or placeholder values.
    fn credentials(&self) -> AuthResult<(&str, &str)> {
        let id = self
            .config
            .client_id
            .as_deref()
            .filter(|v| !utils::is_placeholder(v))
            .ok_or_else(|| AuthError::Configuration("Missing Spotify client id".to_string()))?;
        let secret = self
            .config
            .client_secret
            .as_deref()
            .filter(|v| !utils::is_placeholder(v))
            .ok_or_else(|| {
                AuthError::Configuration("Missing Spotify client secret".to_string())
            })?;
        Ok((id, secret))
    }

    /// Builds the URL the browser is sent to for user consent.
    ///
    /// Deterministic for a given configuration and free of side effects.
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] when the credentials are missing, still the
    /// template placeholders, or the configured authorize URL does not parse.
    pub fn authorize_url(&self) -> AuthResult<String> {
        let (client_id, _) = self.credentials()?;

        let mut url = Url::parse(&self.config.auth_url).map_err(|e| {
            AuthError::Configuration(format!(
                "Invalid authorize URL '{}': {}",
                self.config.auth_url, e
            ))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("show_dialog", if self.config.show_dialog { "true" } else { "false" });

        Ok(url.into())
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Authorization codes are single-use, so a rejection is returned as is
    /// and never retried.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Configuration`] when credentials are not set up
    /// - [`AuthError::UpstreamAuth`] when Spotify rejects the code (expired,
    ///   already used, redirect URI mismatch) or cannot be reached
    pub async fn exchange_code(&self, code: &str) -> AuthResult<Token> {
        let res = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.config.redirect_uri),
            ])
            .await?;

        let body = Self::read_token_response(res).await?;
        Ok(Self::to_token(body, None))
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify does not always rotate refresh tokens; when the response carries
    /// none, the one passed in is kept on the returned token.
    ///
    /// # Errors
    ///
    /// [`AuthError::UpstreamAuth`] when the refresh token was revoked or expired,
    /// which ends the session it belongs to.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<Token> {
        let res = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let body = Self::read_token_response(res).await?;
        Ok(Self::to_token(body, Some(refresh_token)))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> AuthResult<Response> {
        let (client_id, client_secret) = self.credentials()?;

        self.http
            .post(&self.config.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::UpstreamAuth(format!("Token endpoint unreachable: {}", e)))
    }

    async fn read_token_response(res: Response) -> AuthResult<TokenResponse> {
        let status = res.status();
        if !status.is_success() {
            let body: TokenErrorResponse = res.json().await.unwrap_or_default();
            let reason = body
                .error_description
                .or(body.error)
                .unwrap_or_else(|| status.to_string());
            return Err(AuthError::UpstreamAuth(reason));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::UpstreamAuth(format!("Malformed token response: {}", e)))
    }

    fn to_token(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: body.access_token,
            refresh_token: body
                .refresh_token
                .filter(|r| !r.is_empty())
                .or_else(|| previous_refresh.map(str::to_string)),
            scope: body.scope.unwrap_or_default(),
            expires_in: body.expires_in,
            obtained_at: Utc::now().timestamp().max(0) as u64,
        }
    }
}
