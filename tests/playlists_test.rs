mod common;

use reqwest::Client;
use serde_json::json;
use spotmerge::{error::AuthError, spotify::PlaylistAggregator};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

use common::page_json;

async fn aggregator(server: &MockServer) -> PlaylistAggregator {
    PlaylistAggregator::new(format!("{}/v1", server.uri()), Client::new())
}

async fn mount_first_page(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .and(query_param("limit", "50"))
        .and(header("authorization", "Bearer access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collects_every_page_in_order() {
    let server = MockServer::start().await;
    let page2 = format!("{}/v1/me/playlists/page/2", server.uri());
    let page3 = format!("{}/v1/me/playlists/page/3", server.uri());

    mount_first_page(&server, page_json(0..50, Some(page2))).await;
    mount_page(
        &server,
        "/v1/me/playlists/page/2",
        ResponseTemplate::new(200).set_body_json(page_json(50..100, Some(page3))),
    )
    .await;
    mount_page(
        &server,
        "/v1/me/playlists/page/3",
        ResponseTemplate::new(200).set_body_json(page_json(100..110, None)),
    )
    .await;

    let playlists = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap();

    assert_eq!(playlists.len(), 110);
    let ids: Vec<String> = playlists.iter().map(|p| p.id.clone()).collect();
    let expected: Vec<String> = (0..110).map(|n| format!("pl{}", n)).collect();
    assert_eq!(ids, expected);

    let last = playlists.last().unwrap();
    assert_eq!(last.name, "Playlist 109");
    assert_eq!(last.total_tracks, 109);
    assert_eq!(
        last.image.as_deref(),
        Some("https://i.scdn.co/image/109-large")
    );
    assert_eq!(last.owner, "Owner Name");
}

#[tokio::test]
async fn test_skips_null_and_empty_entries() {
    let server = MockServer::start().await;
    let body = json!({
        "items": [
            null,
            common::playlist_json(1),
            { "id": "", "name": "ghost" },
            null,
            { "id": "nameless", "name": "", "owner": { "id": "u", "display_name": "U" } },
            { "id": "orphan", "name": "Orphan", "owner": null },
            common::playlist_json(2)
        ],
        "next": null,
        "total": 7
    });
    mount_first_page(&server, body).await;

    let playlists = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap();

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["pl1", "pl2"]);
}

#[tokio::test]
async fn test_empty_library() {
    let server = MockServer::start().await;
    mount_first_page(&server, json!({ "items": [], "next": null, "total": 0 })).await;

    let playlists = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap();
    assert!(playlists.is_empty());
}

#[tokio::test]
async fn test_failing_middle_page_fails_whole_listing() {
    let server = MockServer::start().await;
    let page2 = format!("{}/v1/me/playlists/page/2", server.uri());
    let page3 = format!("{}/v1/me/playlists/page/3", server.uri());

    mount_first_page(&server, page_json(0..50, Some(page2))).await;
    mount_page(
        &server,
        "/v1/me/playlists/page/2",
        ResponseTemplate::new(500).set_body_json(json!({
            "error": { "status": 500, "message": "Server error" }
        })),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists/page/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(100..110, Some(page3))))
        .expect(0)
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::UpstreamApi {
            status: 500,
            message: "Server error".to_string()
        }
    );
}

#[tokio::test]
async fn test_unauthorized_page_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UpstreamApi { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_page_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UpstreamApi { status: 502, .. }));
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..3, None)))
        .expect(1)
        .mount(&server)
        .await;

    let playlists = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap();
    assert_eq!(playlists.len(), 3);
}

#[tokio::test]
async fn test_long_retry_after_is_not_waited_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3600"))
        .expect(1)
        .mount(&server)
        .await;

    let err = aggregator(&server)
        .await
        .list_all_playlists("access-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UpstreamApi { status: 429, .. }));
}
