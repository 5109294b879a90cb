//! Rust models matching the catalog tables.

use serde::{Deserialize, Serialize};
use trackdeck_common::{AlbumId, TrackId};

/// Row of the `albums` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumRow {
    pub album_id: AlbumId,
    pub album_name: String,
    pub track_count: i64,
}

/// Row of the `tracks` table.
///
/// `tags` keeps the pipe-delimited storage form; splitting happens when the
/// catalog is assembled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackRow {
    pub track_id: TrackId,
    pub title: String,
    pub album_name: String,
    pub album_id: AlbumId,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    pub description: String,
    pub seo_keywords: String,
    pub prompt: String,
    pub tags: String,
    pub cover_prompt: String,
    pub seed: String,
    pub created_at: String,
    pub has_audio: bool,
    pub has_video: bool,
}
