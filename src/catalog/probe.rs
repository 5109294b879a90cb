//! Media presence detection for catalog tracks.

use std::path::PathBuf;
use std::sync::Arc;
use trackdeck_common::paths::{MediaLocation, MediaRoot};
use trackdeck_common::{Error, MediaKind, Result, Track};

use crate::config::MediaConfig;

/// Sets `hasAudio`/`hasVideo` and the media paths from what exists under the
/// media root.
#[derive(Debug, Clone)]
pub struct MediaProbe {
    root: Arc<MediaRoot>,
    audio_file: String,
    video_file: String,
}

impl MediaProbe {
    pub fn new(root: Arc<MediaRoot>, media: &MediaConfig) -> Self {
        Self {
            root,
            audio_file: media.filename(MediaKind::Audio).to_string(),
            video_file: media.filename(MediaKind::Video).to_string(),
        }
    }

    /// Probe every track on a blocking thread.
    pub async fn apply(&self, tracks: Vec<Track>) -> Result<Vec<Track>> {
        let probe = self.clone();
        tokio::task::spawn_blocking(move || {
            tracks
                .into_iter()
                .map(|mut track| {
                    probe.probe_track(&mut track);
                    track
                })
                .collect()
        })
        .await
        .map_err(|e| Error::internal(format!("media probe task failed: {e}")))
    }

    /// A flag the source already asserted stays set.
    fn probe_track(&self, track: &mut Track) {
        if let Some(path) = self.find(track, &self.audio_file) {
            track.has_audio = true;
            track.audio_path.get_or_insert(path);
        }
        if let Some(path) = self.find(track, &self.video_file) {
            track.has_video = true;
            track.video_path.get_or_insert(path);
        }
    }

    fn find(&self, track: &Track, filename: &str) -> Option<PathBuf> {
        let [album, seed] = track.media_segments();
        let location = MediaLocation {
            album: album.to_string(),
            track: seed.to_string(),
            filename: filename.to_string(),
        };
        match location.resolve(&self.root) {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(track_id = %track.id, error = %e, "Track media not addressable");
                None
            }
        }
    }
}
