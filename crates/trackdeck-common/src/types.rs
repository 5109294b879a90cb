//! Catalog entities and media kinds.
//!
//! Track and album field names follow the upstream CSV export (`snake_case`);
//! the presence flags and derived fields use the camelCase names the
//! dashboard UI reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::ids::{AlbumId, TrackId};

/// Split a pipe-delimited tag field into an ordered list.
///
/// Entries are trimmed and empty entries dropped. Order and duplicates are
/// preserved.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Join a tag list back into its pipe-delimited storage form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join("|")
}

/// A generated track as presented by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub track_id: TrackId,
    pub title: String,
    pub album_name: String,
    pub album_id: AlbumId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    pub description: String,
    pub seo_keywords: String,
    pub prompt: String,
    pub tags: Vec<String>,
    pub cover_prompt: String,
    /// Generation seed; the media-addressing key under an album directory.
    pub seed: String,
    pub created_at: String,
    #[serde(rename = "hasAudio")]
    pub has_audio: bool,
    #[serde(rename = "hasVideo")]
    pub has_video: bool,
    #[serde(rename = "audioPath", default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,
    #[serde(rename = "videoPath", default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<PathBuf>,
    #[serde(rename = "coverUrl", default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl Track {
    /// The `(album, track)` segments that address this track's media.
    pub fn media_segments(&self) -> [&str; 2] {
        [self.album_name.as_str(), self.seed.as_str()]
    }

    /// URL path of the media endpoint serving `kind` for this track.
    pub fn media_url(&self, kind: MediaKind) -> String {
        let [album, track] = self.media_segments();
        format!(
            "{}/{}/{}",
            kind.route_prefix(),
            urlencoding::encode(album),
            urlencoding::encode(track)
        )
    }
}

/// An album as recorded by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub album_id: AlbumId,
    pub album_name: String,
    /// Cached count from the source; may be stale.
    pub track_count: u32,
}

/// Derived catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_tracks: usize,
    pub audio_found: usize,
    pub videos_rendered: usize,
    pub last_scan: DateTime<Utc>,
}

impl CatalogStats {
    /// Compute stats for a track list loaded at `last_scan`.
    pub fn from_tracks(tracks: &[Track], last_scan: DateTime<Utc>) -> Self {
        Self {
            total_tracks: tracks.len(),
            audio_found: tracks.iter().filter(|t| t.has_audio).count(),
            videos_rendered: tracks.iter().filter(|t| t.has_video).count(),
            last_scan,
        }
    }
}

/// The role a media file plays for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Square cover art.
    Cover,
    /// Rendered song.
    Audio,
    /// Rendered music video.
    Video,
}

impl MediaKind {
    /// Fixed content type served for this kind.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Cover => "image/png",
            Self::Audio => "audio/mpeg",
            Self::Video => "video/mp4",
        }
    }

    /// Whether responses for this kind honour `Range` requests.
    pub fn is_seekable(self) -> bool {
        !matches!(self, Self::Cover)
    }

    /// Route prefix of the endpoint serving this kind.
    pub fn route_prefix(self) -> &'static str {
        match self {
            Self::Cover => "/media-cover",
            Self::Audio => "/media-audio",
            Self::Video => "/media-video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => write!(f, "cover"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(Self::Cover),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            other => Err(format!("unknown media kind '{other}'")),
        }
    }
}
