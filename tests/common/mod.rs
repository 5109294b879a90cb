//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds a media tree and a `library.json` snapshot in a
//! temporary directory, then wires a full [`AppContext`] over them. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;

use trackdeck::config::{CatalogSourceKind, Config};
use trackdeck::server::{create_router, AppContext};

/// Deterministic 1000-byte payload used for every audio/video fixture.
pub fn sample_bytes() -> Vec<u8> {
    (0..1000u32).map(|i| (i % 251) as u8).collect()
}

pub const COVER_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-cover";

pub const LIBRARY_JSON: &str = r#"{
    "tracks": [
        {"id": "T1", "track_id": "T1", "title": "Sea Shanty", "album_name": "Pirate Dub",
         "album_id": "ALB1", "seed": "S1", "tags": "Dubstep|Pirate| Epic |",
         "hasAudio": true},
        {"id": "T2", "track_id": "T2", "title": "Kraken", "album_name": "Pirate Dub",
         "album_id": "ALB1", "seed": "S2", "tags": ["Dubstep"], "hasVideo": true},
        {"id": "T1", "track_id": "T1", "title": "Duplicate", "album_name": "Pirate Dub",
         "album_id": "ALB1", "seed": "S1"}
    ]
}"#;

/// Test harness wrapping a fully-constructed [`AppContext`] over a temporary
/// media root.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
    pub media_root: PathBuf,
}

impl TestHarness {
    /// Media tree:
    ///
    /// ```text
    /// <tmp>/songs/Pirate Dub/S1/{square.png,song.mp3,video.mp4}
    /// <tmp>/songs2/Pirate Dub/S1/song.mp3   (sibling with a shared prefix)
    /// <tmp>/secret.txt
    /// <tmp>/library.json
    /// ```
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Like [`TestHarness::new`], letting the caller adjust the config before
    /// the context is built.
    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media_root = dir.path().join("songs");
        let track_dir = media_root.join("Pirate Dub").join("S1");
        std::fs::create_dir_all(&track_dir).unwrap();
        std::fs::write(track_dir.join("square.png"), COVER_BYTES).unwrap();
        std::fs::write(track_dir.join("song.mp3"), sample_bytes()).unwrap();
        std::fs::write(track_dir.join("video.mp4"), sample_bytes()).unwrap();

        let sibling = dir.path().join("songs2").join("Pirate Dub").join("S1");
        std::fs::create_dir_all(&sibling).unwrap();
        std::fs::write(sibling.join("song.mp3"), b"sibling").unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        let library = dir.path().join("library.json");
        std::fs::write(&library, LIBRARY_JSON).unwrap();

        let mut config = Config::default();
        config.media.root = Some(media_root.clone());
        config.catalog.source = CatalogSourceKind::Snapshot;
        config.catalog.snapshot_path = library;
        adjust(&mut config);

        let ctx = AppContext::from_config(config, None).expect("failed to build context");
        Self {
            ctx,
            dir,
            media_root,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Collect a response body into bytes.
pub async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body into JSON.
pub async fn body_json(body: Body) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}
