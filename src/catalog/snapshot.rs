//! Precomputed `library.json` source.
//!
//! The snapshot is written by an offline scan and already carries presence
//! flags and media paths. A `stats` block may be present; it is ignored and
//! recomputed on load.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use trackdeck_common::{Error, Result};

use super::{AlbumRecord, CatalogSource, RawCatalog, TagField, TrackRecord};

const SOURCE_NAME: &str = "snapshot";

#[derive(Debug, Deserialize)]
struct LibraryFile {
    tracks: Vec<SnapshotTrack>,
    #[serde(default)]
    albums: Vec<SnapshotAlbum>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotTags {
    List(Vec<String>),
    Delimited(String),
}

#[derive(Debug, Deserialize)]
struct SnapshotTrack {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    track_id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    album_id: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    filepath: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    seo_keywords: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    tags: Option<SnapshotTags>,
    #[serde(default)]
    cover_prompt: String,
    #[serde(default)]
    seed: String,
    #[serde(default)]
    created_at: String,
    #[serde(default, alias = "hasAudio")]
    has_audio: Option<bool>,
    #[serde(default, alias = "hasVideo")]
    has_video: Option<bool>,
    #[serde(default, alias = "audioPath")]
    audio_path: Option<PathBuf>,
    #[serde(default, alias = "videoPath")]
    video_path: Option<PathBuf>,
}

impl From<SnapshotTrack> for TrackRecord {
    fn from(t: SnapshotTrack) -> Self {
        let key = t
            .track_id
            .filter(|k| !k.trim().is_empty())
            .or(t.id)
            .unwrap_or_default();
        let tags = match t.tags {
            Some(SnapshotTags::List(list)) => TagField::List(list),
            Some(SnapshotTags::Delimited(raw)) => TagField::Delimited(raw),
            None => TagField::default(),
        };

        Self {
            key,
            title: t.title,
            album_name: t.album_name,
            album_id: t.album_id,
            filename: t.filename,
            filepath: t.filepath,
            description: t.description,
            seo_keywords: t.seo_keywords,
            prompt: t.prompt,
            tags,
            cover_prompt: t.cover_prompt,
            seed: t.seed,
            created_at: t.created_at,
            has_audio: t.has_audio,
            has_video: t.has_video,
            audio_path: t.audio_path,
            video_path: t.video_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotAlbum {
    album_id: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    track_count: u32,
}

pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CatalogSource for SnapshotSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<RawCatalog> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::catalog(SOURCE_NAME, format!("{}: {e}", self.path.display())))?;

        let library: LibraryFile = serde_json::from_str(&content)
            .map_err(|e| Error::catalog(SOURCE_NAME, format!("{}: {e}", self.path.display())))?;

        Ok(RawCatalog {
            tracks: library.tracks.into_iter().map(TrackRecord::from).collect(),
            albums: library
                .albums
                .into_iter()
                .map(|a| AlbumRecord {
                    album_id: a.album_id,
                    album_name: a.album_name,
                    track_count: a.track_count,
                })
                .collect(),
        })
    }
}
