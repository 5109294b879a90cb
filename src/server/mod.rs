use crate::catalog::{self, CatalogService, MediaProbe};
use crate::config::Config;
use crate::streaming;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use trackdeck_common::paths::MediaRoot;
use trackdeck_db::pool::DbPool;

mod error;
mod request_id;
pub mod routes_catalog;

pub use error::AppError;
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Validated media root; `None` disables the media endpoints
    pub media_root: Option<Arc<MediaRoot>>,
    pub catalog: Arc<CatalogService>,
}

impl AppContext {
    /// Validate the media root and wire up the configured catalog source.
    ///
    /// `db_pool` must be open when the database source is selected.
    pub fn from_config(config: Config, db_pool: Option<DbPool>) -> Result<Self> {
        let media_root = match &config.media.root {
            Some(root) => Some(Arc::new(
                MediaRoot::new(root).context("Invalid media root")?,
            )),
            None => {
                tracing::warn!("No media root configured, media endpoints are disabled");
                None
            }
        };

        let source = catalog::build_source(&config.catalog, db_pool)
            .context("Failed to set up catalog source")?;
        let mut service = CatalogService::new(source);
        if config.catalog.probe_media {
            if let Some(root) = &media_root {
                service = service.with_probe(MediaProbe::new(Arc::clone(root), &config.media));
            }
        }

        Ok(Self {
            config: Arc::new(config),
            media_root,
            catalog: Arc::new(service),
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::RANGE, X_REQUEST_ID.clone()])
        .expose_headers([
            header::CONTENT_RANGE,
            header::ACCEPT_RANGES,
            header::CONTENT_LENGTH,
            X_REQUEST_ID.clone(),
        ]);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .merge(routes_catalog::catalog_routes())
        .merge(streaming::media_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server and run until a shutdown signal arrives
pub async fn start_server(config: Config, db_pool: Option<DbPool>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::from_config(config, db_pool)?;

    // Warm the cache so a broken source shows up at startup rather than on
    // the first dashboard request.
    match ctx.catalog.load().await {
        Ok(snapshot) => tracing::info!(
            source = ctx.catalog.source_name(),
            tracks = snapshot.stats.total_tracks,
            albums = snapshot.catalog.albums.len(),
            "Catalog loaded"
        ),
        Err(e) => tracing::error!(
            source = ctx.catalog.source_name(),
            error = %e,
            "Initial catalog load failed"
        ),
    }

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_rejects_missing_media_root() {
        let mut config = Config::default();
        config.media.root = Some(PathBuf::from("/nonexistent/trackdeck-media"));
        assert!(AppContext::from_config(config, None).is_err());
    }

    #[test]
    fn test_context_without_media_root() {
        let ctx = AppContext::from_config(Config::default(), None).unwrap();
        assert!(ctx.media_root.is_none());
        assert_eq!(ctx.catalog.source_name(), "snapshot");
    }
}
