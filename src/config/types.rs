use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trackdeck_common::MediaKind;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built dashboard UI, served as an SPA fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Absolute directory holding `<album>/<track>/<file>` media.
    /// Media endpoints answer 404 when unset.
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_cover_file")]
    pub cover_file: String,

    #[serde(default = "default_audio_file")]
    pub audio_file: String,

    #[serde(default = "default_video_file")]
    pub video_file: String,
}

fn default_cover_file() -> String {
    "square.png".to_string()
}
fn default_audio_file() -> String {
    "song.mp3".to_string()
}
fn default_video_file() -> String {
    "video.mp4".to_string()
}

impl MediaConfig {
    /// File name stored under each track directory for `kind`.
    pub fn filename(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Cover => &self.cover_file,
            MediaKind::Audio => &self.audio_file,
            MediaKind::Video => &self.video_file,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: None,
            cover_file: default_cover_file(),
            audio_file: default_audio_file(),
            video_file: default_video_file(),
        }
    }
}

/// Which backing store supplies the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    /// Precomputed `library.json`
    #[default]
    Snapshot,
    /// `tracks.csv` + `albums.csv` export
    Csv,
    /// SQLite catalog database
    Database,
}

impl std::fmt::Display for CatalogSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Csv => write!(f, "csv"),
            Self::Database => write!(f, "database"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSourceKind,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    #[serde(default = "default_tracks_csv")]
    pub tracks_csv: PathBuf,

    #[serde(default = "default_albums_csv")]
    pub albums_csv: PathBuf,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Check the media root for rendered audio/video when loading the catalog
    #[serde(default)]
    pub probe_media: bool,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/library.json")
}
fn default_tracks_csv() -> PathBuf {
    PathBuf::from("data/tracks.csv")
}
fn default_albums_csv() -> PathBuf {
    PathBuf::from("data/albums.csv")
}
fn default_db_path() -> PathBuf {
    PathBuf::from("data/trackdeck.db")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSourceKind::default(),
            snapshot_path: default_snapshot_path(),
            tracks_csv: default_tracks_csv(),
            albums_csv: default_albums_csv(),
            db_path: default_db_path(),
            probe_media: false,
        }
    }
}

impl CatalogConfig {
    /// Files the selected source reads.
    pub fn source_paths(&self) -> Vec<&PathBuf> {
        match self.source {
            CatalogSourceKind::Snapshot => vec![&self.snapshot_path],
            CatalogSourceKind::Csv => vec![&self.tracks_csv, &self.albums_csv],
            CatalogSourceKind::Database => vec![&self.db_path],
        }
    }
}
