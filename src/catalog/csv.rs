//! CSV export source (`tracks.csv` + `albums.csv`).

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use trackdeck_common::{Error, Result};

use super::{AlbumRecord, CatalogSource, RawCatalog, TagField, TrackRecord};

const SOURCE_NAME: &str = "csv";

#[derive(Debug, Deserialize)]
struct TrackCsvRow {
    track_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    album_id: String,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    filepath: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    seo_keywords: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    cover_prompt: String,
    #[serde(default)]
    seed: String,
    #[serde(default)]
    created_at: String,
}

impl From<TrackCsvRow> for TrackRecord {
    fn from(row: TrackCsvRow) -> Self {
        Self {
            key: row.track_id,
            title: row.title,
            album_name: row.album_name,
            album_id: row.album_id,
            filename: Some(row.filename),
            filepath: Some(row.filepath),
            description: row.description,
            seo_keywords: row.seo_keywords,
            prompt: row.prompt,
            tags: TagField::Delimited(row.tags),
            cover_prompt: row.cover_prompt,
            seed: row.seed,
            created_at: row.created_at,
            // The export says nothing about rendered media.
            has_audio: None,
            has_video: None,
            audio_path: None,
            video_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlbumCsvRow {
    album_id: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    track_count: String,
}

impl From<AlbumCsvRow> for AlbumRecord {
    fn from(row: AlbumCsvRow) -> Self {
        Self {
            album_id: row.album_id,
            album_name: row.album_name,
            track_count: parse_count(&row.track_count),
        }
    }
}

/// Blank or unparseable counts read as zero.
fn parse_count(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn read_rows<T, R>(path: &Path) -> Result<Vec<R>>
where
    T: for<'de> Deserialize<'de>,
    R: From<T>,
{
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::Headers)
        .flexible(false)
        .from_path(path)
        .map_err(|e| Error::catalog(SOURCE_NAME, format!("{}: {e}", path.display())))?;

    reader
        .deserialize::<T>()
        .map(|row| {
            row.map(R::from)
                .map_err(|e| Error::catalog(SOURCE_NAME, format!("{}: {e}", path.display())))
        })
        .collect()
}

/// Read every row of a `tracks.csv` export.
pub fn read_tracks(path: &Path) -> Result<Vec<TrackRecord>> {
    read_rows::<TrackCsvRow, TrackRecord>(path)
}

/// Read every row of an `albums.csv` export.
pub fn read_albums(path: &Path) -> Result<Vec<AlbumRecord>> {
    read_rows::<AlbumCsvRow, AlbumRecord>(path)
}

/// Reads the catalog from a CSV export on every fetch.
pub struct CsvSource {
    tracks_csv: PathBuf,
    albums_csv: PathBuf,
}

impl CsvSource {
    pub fn new(tracks_csv: PathBuf, albums_csv: PathBuf) -> Self {
        Self {
            tracks_csv,
            albums_csv,
        }
    }
}

#[async_trait]
impl CatalogSource for CsvSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<RawCatalog> {
        let tracks_csv = self.tracks_csv.clone();
        let albums_csv = self.albums_csv.clone();

        tokio::task::spawn_blocking(move || {
            Ok(RawCatalog {
                tracks: read_tracks(&tracks_csv)?,
                albums: read_albums(&albums_csv)?,
            })
        })
        .await
        .map_err(|e| Error::catalog(SOURCE_NAME, format!("reader task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TRACKS: &str = "\
track_id,title,album_name,album_id,filename,filepath,description,seo_keywords,prompt,tags,cover_prompt,seed,created_at
T1,Sea Shanty,Pirate Dub,ALB1,t1.mp3,/exports/t1.mp3,Arr,\"pirate, dub\",make it salty,Dubstep|Pirate| Epic |,a ship,S1,2025-03-01T12:00:00Z
T2,Kraken,Pirate Dub,ALB1,,,,,,,,S2,
";

    const ALBUMS: &str = "\
album_id,album_name,track_count
ALB1,Pirate Dub,2
ALB2,Empty,
";

    fn write_export(tracks: &str, albums: &str) -> (tempfile::TempDir, CsvSource) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tracks.csv"), tracks).unwrap();
        std::fs::write(dir.path().join("albums.csv"), albums).unwrap();
        let source = CsvSource::new(dir.path().join("tracks.csv"), dir.path().join("albums.csv"));
        (dir, source)
    }

    #[tokio::test]
    async fn test_reads_export() {
        let (_dir, source) = write_export(TRACKS, ALBUMS);
        let raw = source.fetch().await.unwrap();

        assert_eq!(raw.tracks.len(), 2);
        let first = &raw.tracks[0];
        assert_eq!(first.key, "T1");
        assert_eq!(first.seo_keywords, "pirate, dub");
        assert_eq!(first.tags, TagField::Delimited("Dubstep|Pirate| Epic |".into()));
        assert_eq!(first.has_audio, None);

        assert_eq!(raw.albums.len(), 2);
        assert_eq!(raw.albums[0].track_count, 2);
        assert_eq!(raw.albums[1].track_count, 0);
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let (dir, _) = write_export(TRACKS, ALBUMS);
        let source = CsvSource::new(dir.path().join("nope.csv"), dir.path().join("albums.csv"));
        let err = source.fetch().await.unwrap_err();
        assert_matches!(err, Error::Catalog { ref source_name, .. } if source_name == "csv");
    }

    #[tokio::test]
    async fn test_ragged_row_fails_whole_load() {
        let ragged = "track_id,title\nT1,One\nT2,Two,extra\n";
        let (_dir, source) = write_export(ragged, ALBUMS);
        assert!(source.fetch().await.is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("many"), 0);
    }
}
