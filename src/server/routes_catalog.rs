//! Catalog API routes.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};

use super::{AppContext, AppError, RequestId};

pub fn catalog_routes() -> Router<AppContext> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/reload", post(reload_catalog))
}

/// `GET /catalog` - tracks, albums and stats from the cached catalog.
async fn get_catalog(
    State(ctx): State<AppContext>,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let snapshot = ctx.catalog.load().await.map_err(|e| {
        AppError::new(e).with_request_id(request_id.map(|Extension(RequestId(id))| id))
    })?;
    Ok(Json(&*snapshot).into_response())
}

/// `POST /catalog/reload` - drop the cache, reload and return the new stats.
async fn reload_catalog(
    State(ctx): State<AppContext>,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let snapshot = ctx.catalog.reload().await.map_err(|e| {
        AppError::new(e).with_request_id(request_id.map(|Extension(RequestId(id))| id))
    })?;
    Ok(Json(&snapshot.stats).into_response())
}
