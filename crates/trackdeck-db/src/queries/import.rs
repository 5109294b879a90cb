//! Batch import of a full catalog export.

use rusqlite::Connection;
use trackdeck_common::{Error, Result};

use super::{albums, tracks};
use crate::models::{AlbumRow, TrackRow};

/// Rows written by [`import_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub albums: usize,
    pub tracks: usize,
    /// Tracks in the database once the import has committed.
    pub total_tracks: i64,
}

/// Upsert every album and track in one transaction.
///
/// Either the whole batch lands or nothing does.
pub fn import_catalog(
    conn: &Connection,
    album_rows: &[AlbumRow],
    track_rows: &[TrackRow],
) -> Result<ImportSummary> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(format!("Failed to start import transaction: {e}")))?;

    for album in album_rows {
        albums::upsert_album(&tx, album)?;
    }
    for track in track_rows {
        tracks::upsert_track(&tx, track)?;
    }

    tx.commit()
        .map_err(|e| Error::database(format!("Failed to commit import: {e}")))?;

    let total_tracks = tracks::count_tracks(conn)?;
    tracing::info!(
        albums = album_rows.len(),
        tracks = track_rows.len(),
        total_tracks,
        "Imported catalog"
    );

    Ok(ImportSummary {
        albums: album_rows.len(),
        tracks: track_rows.len(),
        total_tracks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};
    use trackdeck_common::{AlbumId, TrackId};

    fn track(id: &str) -> TrackRow {
        TrackRow {
            track_id: TrackId::new(id),
            title: id.into(),
            album_name: "Album".into(),
            album_id: AlbumId::new("A"),
            filename: None,
            filepath: None,
            description: String::new(),
            seo_keywords: String::new(),
            prompt: String::new(),
            tags: String::new(),
            cover_prompt: String::new(),
            seed: id.into(),
            created_at: String::new(),
            has_audio: false,
            has_video: false,
        }
    }

    #[test]
    fn test_import_writes_everything() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let album = AlbumRow {
            album_id: AlbumId::new("A"),
            album_name: "Album".into(),
            track_count: 2,
        };
        let summary = import_catalog(&conn, &[album], &[track("T1"), track("T2")]).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                albums: 1,
                tracks: 2,
                total_tracks: 2
            }
        );
        assert_eq!(albums::list_albums(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_import_is_idempotent() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        import_catalog(&conn, &[], &[track("T1")]).unwrap();
        let summary = import_catalog(&conn, &[], &[track("T1"), track("T2")]).unwrap();
        assert_eq!(summary.tracks, 2);
        assert_eq!(summary.total_tracks, 2);
    }
}
