//! Track database queries.

use rusqlite::Connection;
use trackdeck_common::{AlbumId, Error, Result, TrackId};

use crate::models::TrackRow;

const TRACK_COLUMNS: &str = "track_id, title, album_name, album_id, filename, filepath, \
     description, seo_keywords, prompt, tags, cover_prompt, seed, created_at, \
     has_audio, has_video";

/// Insert a track, or overwrite every column if the ID already exists.
pub fn upsert_track(conn: &Connection, track: &TrackRow) -> Result<()> {
    conn.execute(
        "INSERT INTO tracks (track_id, title, album_name, album_id, filename, filepath,
                             description, seo_keywords, prompt, tags, cover_prompt, seed,
                             created_at, has_audio, has_video)
         VALUES (:track_id, :title, :album_name, :album_id, :filename, :filepath,
                 :description, :seo_keywords, :prompt, :tags, :cover_prompt, :seed,
                 :created_at, :has_audio, :has_video)
         ON CONFLICT(track_id) DO UPDATE SET
             title = excluded.title,
             album_name = excluded.album_name,
             album_id = excluded.album_id,
             filename = excluded.filename,
             filepath = excluded.filepath,
             description = excluded.description,
             seo_keywords = excluded.seo_keywords,
             prompt = excluded.prompt,
             tags = excluded.tags,
             cover_prompt = excluded.cover_prompt,
             seed = excluded.seed,
             created_at = excluded.created_at,
             has_audio = excluded.has_audio,
             has_video = excluded.has_video",
        rusqlite::named_params! {
            ":track_id": track.track_id.as_str(),
            ":title": track.title,
            ":album_name": track.album_name,
            ":album_id": track.album_id.as_str(),
            ":filename": track.filename,
            ":filepath": track.filepath,
            ":description": track.description,
            ":seo_keywords": track.seo_keywords,
            ":prompt": track.prompt,
            ":tags": track.tags,
            ":cover_prompt": track.cover_prompt,
            ":seed": track.seed,
            ":created_at": track.created_at,
            ":has_audio": track.has_audio,
            ":has_video": track.has_video,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// List all tracks in insertion order.
pub fn list_tracks(conn: &Connection) -> Result<Vec<TrackRow>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {TRACK_COLUMNS} FROM tracks ORDER BY rowid"))
        .map_err(|e| Error::database(e.to_string()))?;

    let tracks = stmt
        .query_map([], row_to_track)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(tracks)
}

/// Total number of tracks.
pub fn count_tracks(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

fn row_to_track(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackRow> {
    Ok(TrackRow {
        track_id: TrackId::new(row.get::<_, String>(0)?),
        title: row.get(1)?,
        album_name: row.get(2)?,
        album_id: AlbumId::new(row.get::<_, String>(3)?),
        filename: row.get(4)?,
        filepath: row.get(5)?,
        description: row.get(6)?,
        seo_keywords: row.get(7)?,
        prompt: row.get(8)?,
        tags: row.get(9)?,
        cover_prompt: row.get(10)?,
        seed: row.get(11)?,
        created_at: row.get(12)?,
        has_audio: row.get(13)?,
        has_video: row.get(14)?,
    })
}
