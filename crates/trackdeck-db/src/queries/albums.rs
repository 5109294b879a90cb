//! Album database queries.

use rusqlite::Connection;
use trackdeck_common::{AlbumId, Error, Result};

use crate::models::AlbumRow;

/// Insert an album, or update its name and cached count if it already exists.
pub fn upsert_album(conn: &Connection, album: &AlbumRow) -> Result<()> {
    conn.execute(
        "INSERT INTO albums (album_id, album_name, track_count)
         VALUES (:album_id, :album_name, :track_count)
         ON CONFLICT(album_id) DO UPDATE SET
             album_name = excluded.album_name,
             track_count = excluded.track_count",
        rusqlite::named_params! {
            ":album_id": album.album_id.as_str(),
            ":album_name": album.album_name,
            ":track_count": album.track_count,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// List all albums in insertion order.
pub fn list_albums(conn: &Connection) -> Result<Vec<AlbumRow>> {
    let mut stmt = conn
        .prepare("SELECT album_id, album_name, track_count FROM albums ORDER BY rowid")
        .map_err(|e| Error::database(e.to_string()))?;

    let albums = stmt
        .query_map([], row_to_album)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(albums)
}

fn row_to_album(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlbumRow> {
    Ok(AlbumRow {
        album_id: AlbumId::new(row.get::<_, String>(0)?),
        album_name: row.get(1)?,
        track_count: row.get(2)?,
    })
}
