//! Media streaming module.
//!
//! # Routes
//!
//! - `GET /media-cover/{album}/{track}` - Cover art, cached for a year
//! - `GET /media-audio/{album}/{track}` - Rendered song with range support
//! - `GET /media-video/{album}/{track}` - Rendered video with range support
//!
//! Segments are taken from the raw request path and resolved against the
//! media root before any file is touched.

mod direct;

pub use direct::{
    serve_cover, stream_media, ResolvedMedia, COVER_CACHE_CONTROL, STREAM_CHUNK_SIZE,
};

use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap},
    response::Response,
    routing::get,
    Extension, Router,
};
use trackdeck_common::paths::MediaLocation;
use trackdeck_common::{Error, MediaKind, Result};

use crate::server::{AppContext, AppError, RequestId};

/// Create the media router.
pub fn media_router() -> Router<AppContext> {
    Router::new()
        .route("/media-cover/*path", get(cover))
        .route("/media-audio/*path", get(audio))
        .route("/media-video/*path", get(video))
}

async fn cover(
    State(ctx): State<AppContext>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> std::result::Result<Response, AppError> {
    serve(MediaKind::Cover, ctx, uri.path(), &headers, request_id).await
}

async fn audio(
    State(ctx): State<AppContext>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> std::result::Result<Response, AppError> {
    serve(MediaKind::Audio, ctx, uri.path(), &headers, request_id).await
}

async fn video(
    State(ctx): State<AppContext>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> std::result::Result<Response, AppError> {
    serve(MediaKind::Video, ctx, uri.path(), &headers, request_id).await
}

async fn serve(
    kind: MediaKind,
    ctx: AppContext,
    raw_path: &str,
    headers: &HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> std::result::Result<Response, AppError> {
    let request_id = request_id.map(|Extension(RequestId(id))| id);

    let result = async {
        let media = resolve_request(&ctx, kind, raw_path).await?;
        if kind.is_seekable() {
            let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
            stream_media(&media, range).await
        } else {
            serve_cover(&media).await
        }
    }
    .await;

    result.map_err(|e| AppError::new(e).with_request_id(request_id))
}

/// Raw (still percent-encoded) segments following the kind's route prefix.
fn raw_segments(kind: MediaKind, raw_path: &str) -> Vec<String> {
    raw_path
        .strip_prefix(kind.route_prefix())
        .unwrap_or(raw_path)
        .trim_start_matches('/')
        .split('/')
        .map(String::from)
        .collect()
}

/// Turn the request path into a resolved media file.
///
/// Canonicalisation touches the filesystem, so it runs on a blocking thread.
pub async fn resolve_request(
    ctx: &AppContext,
    kind: MediaKind,
    raw_path: &str,
) -> Result<ResolvedMedia> {
    let root = ctx
        .media_root
        .clone()
        .ok_or_else(|| Error::not_found("media root", "not configured"))?;

    let segments = raw_segments(kind, raw_path);
    let filename = ctx.config.media.filename(kind).to_string();

    tokio::task::spawn_blocking(move || {
        let location = MediaLocation::from_segments(&segments, filename)?;
        let path = location.resolve(&root)?;
        Ok(ResolvedMedia {
            kind,
            location,
            path,
        })
    })
    .await
    .map_err(|e| Error::internal(format!("path resolution task failed: {e}")))?
}
