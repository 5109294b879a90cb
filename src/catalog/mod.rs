//! Catalog aggregation.
//!
//! A [`CatalogSource`] produces raw track and album records from one backing
//! store. [`assemble`] normalises them into canonical [`Track`]/[`Album`]
//! lists, and [`CatalogService`] caches the result until an explicit reload.
//!
//! Exactly one source is active, chosen by `catalog.source` in the config:
//!
//! - [`snapshot::SnapshotSource`] reads a precomputed `library.json`
//! - [`csv::CsvSource`] reads `tracks.csv` and `albums.csv`
//! - [`database::DatabaseSource`] reads the SQLite catalog

pub mod csv;
pub mod database;
mod probe;
pub mod snapshot;

pub use probe::MediaProbe;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use trackdeck_common::{
    parse_tags, Album, AlbumId, CatalogStats, Error, MediaKind, Result, Track, TrackId,
};
use trackdeck_db::pool::DbPool;

use crate::config::{CatalogConfig, CatalogSourceKind};

/// Tag field as a source delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagField {
    /// Pipe-delimited storage form, e.g. `"Dubstep|Pirate"`.
    Delimited(String),
    /// Already split by the source.
    List(Vec<String>),
}

impl Default for TagField {
    fn default() -> Self {
        Self::Delimited(String::new())
    }
}

impl TagField {
    fn into_tags(self) -> Vec<String> {
        match self {
            Self::Delimited(raw) => parse_tags(&raw),
            Self::List(list) => list
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// A track as read from a source, before normalisation.
///
/// `key` is the source's primary key; it becomes both `id` and `track_id`.
/// Presence flags are `None` when the source says nothing about them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRecord {
    pub key: String,
    pub title: String,
    pub album_name: String,
    pub album_id: String,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    pub description: String,
    pub seo_keywords: String,
    pub prompt: String,
    pub tags: TagField,
    pub cover_prompt: String,
    pub seed: String,
    pub created_at: String,
    pub has_audio: Option<bool>,
    pub has_video: Option<bool>,
    pub audio_path: Option<PathBuf>,
    pub video_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumRecord {
    pub album_id: String,
    pub album_name: String,
    pub track_count: u32,
}

/// Everything one source returned for a single load.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub tracks: Vec<TrackRecord>,
    pub albums: Vec<AlbumRecord>,
}

/// A backing store that can produce the whole catalog.
///
/// Implementations either return every record or an error; a partial list is
/// never returned.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<RawCatalog>;
}

/// Canonical track and album lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
}

/// A loaded catalog with the stats computed at load time.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    #[serde(flatten)]
    pub catalog: Catalog,
    pub stats: CatalogStats,
}

impl CatalogSnapshot {
    fn new(catalog: Catalog) -> Self {
        let stats = CatalogStats::from_tracks(&catalog.tracks, Utc::now());
        Self { catalog, stats }
    }
}

/// Normalise raw records from `source_name` into a [`Catalog`].
///
/// Tags are parsed, flags default to false, and the primary key is mapped onto
/// `id`. Duplicate IDs keep their first occurrence. A record with an empty
/// primary key fails the whole load. When the source lists no albums they
/// are derived from the tracks.
pub fn assemble(source_name: &str, raw: RawCatalog) -> Result<Catalog> {
    let mut seen = HashSet::new();
    let mut tracks = Vec::with_capacity(raw.tracks.len());

    for (index, record) in raw.tracks.into_iter().enumerate() {
        let key = record.key.trim().to_string();
        if key.is_empty() {
            return Err(Error::catalog(
                source_name,
                format!("track record {} has an empty track_id", index + 1),
            ));
        }
        if !seen.insert(key.clone()) {
            tracing::warn!(
                source = source_name,
                track_id = %key,
                "Duplicate track id, keeping first"
            );
            continue;
        }
        tracks.push(normalise_track(&key, record));
    }

    let albums = if raw.albums.is_empty() {
        derive_albums(&tracks)
    } else {
        let mut seen = HashSet::new();
        let mut albums = Vec::with_capacity(raw.albums.len());
        for (index, record) in raw.albums.into_iter().enumerate() {
            let id = record.album_id.trim();
            if id.is_empty() {
                return Err(Error::catalog(
                    source_name,
                    format!("album record {} has an empty album_id", index + 1),
                ));
            }
            if !seen.insert(id.to_string()) {
                tracing::warn!(
                    source = source_name,
                    album_id = id,
                    "Duplicate album id, keeping first"
                );
                continue;
            }
            albums.push(Album {
                album_id: AlbumId::new(id),
                album_name: record.album_name,
                track_count: record.track_count,
            });
        }
        albums
    };

    Ok(Catalog { tracks, albums })
}

fn normalise_track(key: &str, record: TrackRecord) -> Track {
    let mut track = Track {
        id: TrackId::new(key),
        track_id: TrackId::new(key),
        title: record.title,
        album_name: record.album_name,
        album_id: AlbumId::new(record.album_id),
        filename: record.filename.filter(|s| !s.is_empty()),
        filepath: record.filepath.filter(|s| !s.is_empty()),
        description: record.description,
        seo_keywords: record.seo_keywords,
        prompt: record.prompt,
        tags: record.tags.into_tags(),
        cover_prompt: record.cover_prompt,
        seed: record.seed,
        created_at: record.created_at,
        has_audio: record.has_audio.unwrap_or(false),
        has_video: record.has_video.unwrap_or(false),
        audio_path: record.audio_path,
        video_path: record.video_path,
        cover_url: None,
    };
    if !track.album_name.is_empty() && !track.seed.is_empty() {
        track.cover_url = Some(track.media_url(MediaKind::Cover));
    }
    track
}

/// One album per distinct `album_id`, in order of first appearance.
fn derive_albums(tracks: &[Track]) -> Vec<Album> {
    let mut albums: Vec<Album> = Vec::new();
    for track in tracks.iter().filter(|t| !t.album_id.is_empty()) {
        match albums.iter_mut().find(|a| a.album_id == track.album_id) {
            Some(album) => album.track_count += 1,
            None => albums.push(Album {
                album_id: track.album_id.clone(),
                album_name: track.album_name.clone(),
                track_count: 1,
            }),
        }
    }
    albums
}

/// Process-wide catalog cache over a single source.
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    probe: Option<MediaProbe>,
    cache: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            probe: None,
            cache: RwLock::new(None),
        }
    }

    /// Check the media tree for rendered audio/video on every load.
    pub fn with_probe(mut self, probe: MediaProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Return the cached catalog, loading it on first use.
    pub async fn load(&self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let mut cache = self.cache.write().await;
        // Another task may have loaded while we waited for the lock.
        if let Some(snapshot) = cache.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(self.fetch_snapshot().await?);
        *cache = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the cache and load again from the source.
    ///
    /// On failure the cache stays empty and the error is returned.
    pub async fn reload(&self) -> Result<Arc<CatalogSnapshot>> {
        let mut cache = self.cache.write().await;
        *cache = None;
        let snapshot = Arc::new(self.fetch_snapshot().await?);
        *cache = Some(Arc::clone(&snapshot));
        tracing::info!(
            source = self.source.name(),
            tracks = snapshot.stats.total_tracks,
            "Catalog reloaded"
        );
        Ok(snapshot)
    }

    async fn fetch_snapshot(&self) -> Result<CatalogSnapshot> {
        let name = self.source.name();
        let raw = self.source.fetch().await.map_err(|e| match e {
            e @ Error::Catalog { .. } => e,
            other => Error::catalog(name, other),
        })?;

        let mut catalog = assemble(name, raw)?;
        if let Some(probe) = &self.probe {
            catalog.tracks = probe.apply(catalog.tracks).await?;
        }

        tracing::debug!(
            source = name,
            tracks = catalog.tracks.len(),
            albums = catalog.albums.len(),
            "Catalog loaded"
        );
        Ok(CatalogSnapshot::new(catalog))
    }
}

/// Construct the source selected by `config`.
///
/// The database source needs the pool the binary opened; passing `None` for
/// it is a configuration error.
pub fn build_source(
    config: &CatalogConfig,
    pool: Option<DbPool>,
) -> Result<Arc<dyn CatalogSource>> {
    let source: Arc<dyn CatalogSource> = match config.source {
        CatalogSourceKind::Snapshot => {
            Arc::new(snapshot::SnapshotSource::new(config.snapshot_path.clone()))
        }
        CatalogSourceKind::Csv => Arc::new(csv::CsvSource::new(
            config.tracks_csv.clone(),
            config.albums_csv.clone(),
        )),
        CatalogSourceKind::Database => {
            let pool = pool.ok_or_else(|| {
                Error::validation("catalog source 'database' selected but no database is open")
            })?;
            Arc::new(database::DatabaseSource::new(pool))
        }
    };
    Ok(source)
}
