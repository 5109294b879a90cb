//! SQLite catalog source and CSV import.

use async_trait::async_trait;
use std::path::Path;
use trackdeck_common::{join_tags, AlbumId, Error, Result, TrackId};
use trackdeck_db::models::{AlbumRow, TrackRow};
use trackdeck_db::pool::{get_conn, DbPool};
use trackdeck_db::queries::{albums, import, tracks};

use super::{AlbumRecord, CatalogSource, RawCatalog, TagField, TrackRecord};

const SOURCE_NAME: &str = "database";

impl From<TrackRow> for TrackRecord {
    fn from(row: TrackRow) -> Self {
        Self {
            key: row.track_id.to_string(),
            title: row.title,
            album_name: row.album_name,
            album_id: row.album_id.to_string(),
            filename: row.filename,
            filepath: row.filepath,
            description: row.description,
            seo_keywords: row.seo_keywords,
            prompt: row.prompt,
            tags: TagField::Delimited(row.tags),
            cover_prompt: row.cover_prompt,
            seed: row.seed,
            created_at: row.created_at,
            has_audio: Some(row.has_audio),
            has_video: Some(row.has_video),
            audio_path: None,
            video_path: None,
        }
    }
}

impl From<AlbumRow> for AlbumRecord {
    fn from(row: AlbumRow) -> Self {
        Self {
            album_id: row.album_id.to_string(),
            album_name: row.album_name,
            track_count: u32::try_from(row.track_count).unwrap_or(0),
        }
    }
}

/// Reads the catalog from the SQLite database behind `pool`.
pub struct DatabaseSource {
    pool: DbPool,
}

impl DatabaseSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogSource for DatabaseSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<RawCatalog> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            Ok(RawCatalog {
                tracks: tracks::list_tracks(&conn)?
                    .into_iter()
                    .map(TrackRecord::from)
                    .collect(),
                albums: albums::list_albums(&conn)?
                    .into_iter()
                    .map(AlbumRecord::from)
                    .collect(),
            })
        })
        .await
        .map_err(|e| Error::catalog(SOURCE_NAME, format!("query task failed: {e}")))?
    }
}

fn track_row(record: TrackRecord) -> TrackRow {
    let tags = match record.tags {
        TagField::Delimited(raw) => raw,
        TagField::List(list) => join_tags(&list),
    };
    TrackRow {
        track_id: TrackId::new(record.key.trim()),
        title: record.title,
        album_name: record.album_name,
        album_id: AlbumId::new(record.album_id),
        filename: record.filename.filter(|s| !s.is_empty()),
        filepath: record.filepath.filter(|s| !s.is_empty()),
        description: record.description,
        seo_keywords: record.seo_keywords,
        prompt: record.prompt,
        tags,
        cover_prompt: record.cover_prompt,
        seed: record.seed,
        created_at: record.created_at,
        has_audio: record.has_audio.unwrap_or(false),
        has_video: record.has_video.unwrap_or(false),
    }
}

/// Upsert a CSV export into the database.
///
/// Rows without a primary key are skipped with a warning; everything else is
/// written in one transaction.
pub fn import_csv(
    pool: &DbPool,
    tracks_csv: &Path,
    albums_csv: &Path,
) -> Result<import::ImportSummary> {
    let track_records = super::csv::read_tracks(tracks_csv)?;
    let album_records = super::csv::read_albums(albums_csv)?;

    let track_rows: Vec<TrackRow> = track_records
        .into_iter()
        .filter(|r| {
            let keep = !r.key.trim().is_empty();
            if !keep {
                tracing::warn!(title = %r.title, "Skipping track without track_id");
            }
            keep
        })
        .map(track_row)
        .collect();

    let album_rows: Vec<AlbumRow> = album_records
        .into_iter()
        .filter(|r| {
            let keep = !r.album_id.trim().is_empty();
            if !keep {
                tracing::warn!(album_name = %r.album_name, "Skipping album without album_id");
            }
            keep
        })
        .map(|r| AlbumRow {
            album_id: AlbumId::new(r.album_id.trim()),
            album_name: r.album_name,
            track_count: i64::from(r.track_count),
        })
        .collect();

    let conn = get_conn(pool)?;
    import::import_catalog(&conn, &album_rows, &track_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackdeck_db::pool::init_memory_pool;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let tracks_csv = write(
            dir.path(),
            "tracks.csv",
            "track_id,title,album_name,album_id,tags,seed\n\
             T1,One,Pirate Dub,ALB1,A|B,S1\n\
             ,Orphan,Pirate Dub,ALB1,,S9\n\
             T2,Two,Pirate Dub,ALB1,,S2\n",
        );
        let albums_csv = write(
            dir.path(),
            "albums.csv",
            "album_id,album_name,track_count\nALB1,Pirate Dub,2\n",
        );

        let pool = init_memory_pool().unwrap();
        let summary = import_csv(&pool, &tracks_csv, &albums_csv).unwrap();
        assert_eq!(summary.tracks, 2);
        assert_eq!(summary.albums, 1);
        assert_eq!(summary.total_tracks, 2);

        let raw = DatabaseSource::new(pool).fetch().await.unwrap();
        assert_eq!(raw.tracks.len(), 2);
        assert_eq!(raw.tracks[0].key, "T1");
        assert_eq!(raw.tracks[0].tags, TagField::Delimited("A|B".into()));
        assert_eq!(raw.tracks[0].has_audio, Some(false));
        assert_eq!(raw.albums[0].track_count, 2);
    }

    #[tokio::test]
    async fn test_fetch_reflects_media_flags() {
        let pool = init_memory_pool().unwrap();
        {
            let conn = get_conn(&pool).unwrap();
            let mut row = track_row(TrackRecord {
                key: "T1".into(),
                ..Default::default()
            });
            row.has_video = true;
            tracks::upsert_track(&conn, &row).unwrap();
        }

        let raw = DatabaseSource::new(pool).fetch().await.unwrap();
        assert_eq!(raw.tracks[0].has_video, Some(true));
    }
}
