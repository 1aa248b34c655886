use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    error::{AuthError, AuthResult},
    types::{ApiErrorResponse, PlaylistPage, PlaylistSummary},
    utils, warning,
};

/// Largest page size `GET /me/playlists` accepts.
pub const PAGE_LIMIT: u32 = 50;

/// Longest `Retry-After` we are willing to sit out inside a request.
const MAX_RETRY_AFTER_SECS: u64 = 120;

const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Collects the user's entire playlist library.
///
/// Stateless apart from the HTTP client: every call walks the listing from
/// the first page again.
#[derive(Debug, Clone)]
pub struct PlaylistAggregator {
    api_url: String,
    http: Client,
}

impl PlaylistAggregator {
    pub fn new(api_url: impl Into<String>, http: Client) -> Self {
        Self {
            api_url: api_url.into(),
            http,
        }
    }

    /// Fetches every page of `GET /me/playlists` and flattens it.
    ///
    /// Pages are requested with the maximum page size and the `next` link of
    /// each response is followed until Spotify stops sending one. Items keep
    /// the upstream order; `null` entries (deleted or inaccessible playlists)
    /// and entries without an id are skipped.
    ///
    /// # Errors
    ///
    /// [`AuthError::UpstreamApi`] as soon as any page fails. Whatever was
    /// collected before is dropped: the caller gets all playlists or none.
    pub async fn list_all_playlists(&self, access_token: &str) -> AuthResult<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut next = Some(utils::first_playlists_page(&self.api_url, PAGE_LIMIT));

        while let Some(url) = next {
            let page = self.fetch_page(&url, access_token).await?;
            playlists.extend(page.items.into_iter().flatten().filter_map(utils::summarize));
            next = page.next.filter(|n| !n.is_empty());
        }

        Ok(playlists)
    }

    async fn fetch_page(&self, url: &str, access_token: &str) -> AuthResult<PlaylistPage> {
        let mut attempt = 0;

        loop {
            let response = self
                .http
                .get(url)
                .bearer_auth(access_token)
                .send()
                .await
                .map_err(|e| AuthError::UpstreamApi {
                    status: e.status().map_or(502, |s| s.as_u16()),
                    message: e.to_string(),
                })?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RATE_LIMIT_RETRIES
            {
                if let Some(retry_after) = retry_after(&response) {
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        attempt += 1;
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    warning!(
                        "Spotify asked to retry after {} seconds, giving up on this listing.",
                        retry_after
                    );
                }
            }

            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            return response
                .json::<PlaylistPage>()
                .await
                .map_err(|e| AuthError::UpstreamApi {
                    status: 502,
                    message: format!("Malformed playlist page: {}", e),
                });
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

async fn api_error(response: Response) -> AuthError {
    let status = response.status();
    let message = response
        .json::<ApiErrorResponse>()
        .await
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    AuthError::UpstreamApi {
        status: status.as_u16(),
        message,
    }
}
