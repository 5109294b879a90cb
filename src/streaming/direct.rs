//! Direct file serving with HTTP range requests.
//!
//! Audio and video bodies are streamed lazily in 64 KiB chunks; the file
//! handle lives inside the body stream and is dropped with it, whether the
//! transfer completes, fails, or the client goes away. Covers are small and
//! served from a single buffer with a long-lived cache directive.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use trackdeck_common::paths::MediaLocation;
use trackdeck_common::range::{self, RequestedRange};
use trackdeck_common::{Error, MediaKind, Result};

/// Chunk size for streamed bodies.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Cache directive for cover art; covers never change once rendered.
pub const COVER_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// A media file whose path has passed resolution.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub kind: MediaKind,
    pub location: MediaLocation,
    pub path: PathBuf,
}

impl ResolvedMedia {
    fn not_found(&self) -> Error {
        Error::not_found(self.kind.to_string(), &self.location)
    }

    /// Classify an I/O failure: a missing target is a 404, anything else a 500.
    fn io_error(&self, e: std::io::Error) -> Error {
        match e.kind() {
            ErrorKind::NotFound => self.not_found(),
            _ => Error::from(e),
        }
    }

    async fn file_size(&self) -> Result<u64> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if !metadata.is_file() {
            return Err(self.not_found());
        }
        Ok(metadata.len())
    }
}

/// Serve audio or video, honouring an optional `Range` header.
pub async fn stream_media(
    media: &ResolvedMedia,
    range_header: Option<&str>,
) -> Result<Response> {
    let file_size = media.file_size().await?;
    let requested = range::parse(range_header, file_size)?;
    let length = requested.content_length();

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, media.kind.content_type())
        .header(header::CONTENT_LENGTH, length.to_string())
        .header(header::ACCEPT_RANGES, "bytes");

    let builder = match requested {
        RequestedRange::Full { .. } => builder.status(StatusCode::OK),
        RequestedRange::Partial(r) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, r.content_range()),
    };

    let body = match requested.bounds() {
        None => Body::empty(),
        Some((start, _)) => {
            let mut file = File::open(&media.path)
                .await
                .map_err(|e| media.io_error(e))?;
            if start > 0 {
                file.seek(SeekFrom::Start(start)).await?;
            }
            let limited = file.take(length);
            Body::from_stream(ReaderStream::with_capacity(limited, STREAM_CHUNK_SIZE))
        }
    };

    tracing::debug!(
        kind = %media.kind,
        location = %media.location,
        bytes = length,
        partial = matches!(requested, RequestedRange::Partial(_)),
        "Streaming media"
    );

    builder
        .body(body)
        .map_err(|e| Error::internal(format!("failed to build response: {e}")))
}

/// Serve cover art from a single buffer. `Range` is not consulted.
pub async fn serve_cover(media: &ResolvedMedia) -> Result<Response> {
    media.file_size().await?;
    let bytes = tokio::fs::read(&media.path)
        .await
        .map_err(|e| media.io_error(e))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media.kind.content_type())
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .header(header::CACHE_CONTROL, COVER_CACHE_CONTROL)
        .body(Body::from(bytes))
        .map_err(|e| Error::internal(format!("failed to build response: {e}")))
}
