#![allow(dead_code)]

use chrono::Utc;
use serde_json::{Value, json};
use spotmerge::types::Token;

/// Token obtained now that lives for `expires_in` seconds.
pub fn token(access: &str, refresh: Option<&str>, expires_in: u64) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        scope: "playlist-read-private".to_string(),
        expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

/// Token endpoint answer as Spotify sends it.
pub fn token_body(access: &str, refresh: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "scope": "playlist-read-private playlist-read-collaborative",
        "expires_in": 3600
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

pub fn playlist_json(n: usize) -> Value {
    json!({
        "id": format!("pl{}", n),
        "name": format!("Playlist {}", n),
        "images": [
            { "url": format!("https://i.scdn.co/image/{}-large", n), "height": 640, "width": 640 },
            { "url": format!("https://i.scdn.co/image/{}-small", n), "height": 60, "width": 60 }
        ],
        "owner": { "id": "owner-id", "display_name": "Owner Name" },
        "tracks": { "total": n, "href": "https://api.spotify.com/v1/playlists/x/tracks" }
    })
}

/// One listing page holding playlists `range`, linking to `next`.
pub fn page_json(range: std::ops::Range<usize>, next: Option<String>) -> Value {
    let items: Vec<Value> = range.map(playlist_json).collect();
    json!({
        "href": "ignored",
        "limit": 50,
        "offset": 0,
        "total": items.len(),
        "items": items,
        "next": next,
        "previous": null
    })
}
