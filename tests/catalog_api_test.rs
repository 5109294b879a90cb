//! Integration tests for the catalog routes.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_json, TestHarness};
use tower::ServiceExt;
use trackdeck::config::CatalogSourceKind;

async fn send(h: &TestHarness, method: &str, uri: &str) -> axum::response::Response {
    h.router()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check() {
    let h = TestHarness::new();
    let resp = send(&h, "GET", "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn catalog_from_snapshot() {
    let h = TestHarness::new();
    let resp = send(&h, "GET", "/catalog").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp.into_body()).await;
    let tracks = body["tracks"].as_array().unwrap();
    // The duplicate T1 in the snapshot is dropped, first occurrence kept.
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["id"], "T1");
    assert_eq!(tracks[0]["title"], "Sea Shanty");
    assert_eq!(tracks[0]["tags"], serde_json::json!(["Dubstep", "Pirate", "Epic"]));
    assert_eq!(tracks[0]["hasAudio"], true);
    assert_eq!(tracks[0]["hasVideo"], false);
    assert_eq!(tracks[0]["coverUrl"], "/media-cover/Pirate%20Dub/S1");
    assert_eq!(tracks[1]["hasVideo"], true);

    let albums = body["albums"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["album_id"], "ALB1");
    assert_eq!(albums[0]["track_count"], 2);

    assert_eq!(body["stats"]["totalTracks"], 2);
    assert_eq!(body["stats"]["audioFound"], 1);
    assert_eq!(body["stats"]["videosRendered"], 1);
    assert!(body["stats"]["lastScan"].is_string());
}

#[tokio::test]
async fn catalog_is_cached_until_reload() {
    let h = TestHarness::new();
    let first = body_json(send(&h, "GET", "/catalog").await.into_body()).await;

    std::fs::write(
        h.path().join("library.json"),
        r#"{"tracks": [{"track_id": "NEW", "album_id": "A2", "album_name": "Fresh", "seed": "X"}]}"#,
    )
    .unwrap();

    let cached = body_json(send(&h, "GET", "/catalog").await.into_body()).await;
    assert_eq!(cached["stats"], first["stats"]);

    let resp = send(&h, "POST", "/catalog/reload").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = body_json(resp.into_body()).await;
    assert_eq!(stats["totalTracks"], 1);

    let reloaded = body_json(send(&h, "GET", "/catalog").await.into_body()).await;
    assert_eq!(reloaded["tracks"][0]["id"], "NEW");
}

#[tokio::test]
async fn broken_source_is_500_not_partial() {
    let h = TestHarness::new();
    std::fs::write(h.path().join("library.json"), r#"{"tracks": ["#).unwrap();

    let resp = send(&h, "GET", "/catalog").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["code"], "catalog_error");
    assert!(body.get("tracks").is_none());
}

#[tokio::test]
async fn empty_primary_key_fails_load() {
    let h = TestHarness::new();
    std::fs::write(
        h.path().join("library.json"),
        r#"{"tracks": [{"track_id": "T1"}, {"title": "no id"}]}"#,
    )
    .unwrap();

    let resp = send(&h, "GET", "/catalog").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn catalog_from_csv_export() {
    let h = TestHarness::with_config(|c| {
        c.catalog.source = CatalogSourceKind::Csv;
        c.catalog.tracks_csv = c.catalog.snapshot_path.with_file_name("tracks.csv");
        c.catalog.albums_csv = c.catalog.snapshot_path.with_file_name("albums.csv");
    });
    std::fs::write(
        h.path().join("tracks.csv"),
        "track_id,title,album_name,album_id,tags,seed\n\
         T1,Sea Shanty,Pirate Dub,ALB1,A|B| C |,S1\n",
    )
    .unwrap();
    std::fs::write(
        h.path().join("albums.csv"),
        "album_id,album_name,track_count\nALB1,Pirate Dub,7\n",
    )
    .unwrap();

    let body = body_json(send(&h, "GET", "/catalog").await.into_body()).await;
    assert_eq!(body["tracks"][0]["tags"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(body["tracks"][0]["hasAudio"], false);
    assert_eq!(body["albums"][0]["track_count"], 7);
}

#[tokio::test]
async fn probe_detects_rendered_media() {
    let h = TestHarness::with_config(|c| {
        c.catalog.probe_media = true;
    });

    let body = body_json(send(&h, "GET", "/catalog").await.into_body()).await;
    let t1 = &body["tracks"][0];
    assert_eq!(t1["hasAudio"], true);
    assert_eq!(t1["hasVideo"], true);
    assert!(t1["audioPath"].as_str().unwrap().ends_with("song.mp3"));
    assert_eq!(body["stats"]["videosRendered"], 2);
}
