use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::types::{Playlist, PlaylistSummary};

/// Template values shipped in `.env.example`; treated as "not configured".
pub const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "your_client_id",
    "your_client_secret",
    "YOUR_CLIENT_ID",
    "YOUR_CLIENT_SECRET",
    "changeme",
];

/// Generates an opaque session identifier with 256 bits of entropy.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDER_CREDENTIALS.contains(&value)
}

/// Shortens a secret for log output.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    format!("{}…", prefix)
}

/// Projects an upstream playlist onto the front-end shape.
///
/// Entries without an id or a name are dropped. The owner falls back to the
/// owner id when Spotify has no display name for the account; entries with
/// neither are dropped too.
pub fn summarize(playlist: Playlist) -> Option<PlaylistSummary> {
    if playlist.id.trim().is_empty() || playlist.name.trim().is_empty() {
        return None;
    }

    let image = playlist
        .images
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|i| i.url);

    let owner = playlist.owner.and_then(|o| {
        o.display_name
            .filter(|n| !n.trim().is_empty())
            .or(o.id.filter(|id| !id.trim().is_empty()))
    })?;

    Some(PlaylistSummary {
        id: playlist.id,
        name: playlist.name,
        total_tracks: playlist.tracks.map(|t| t.total).unwrap_or(0),
        image,
        owner,
    })
}

/// Builds the first-page URL of the playlist listing.
pub fn first_playlists_page(api_url: &str, limit: u32) -> String {
    format!(
        "{uri}/me/playlists?limit={limit}",
        uri = api_url.trim_end_matches('/'),
        limit = limit
    )
}
