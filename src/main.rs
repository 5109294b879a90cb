mod cli;

use trackdeck::{
    catalog::{self, database, CatalogService, MediaProbe},
    config::{self, CatalogSourceKind, Config},
    server,
};
use trackdeck_common::paths::{MediaLocation, MediaRoot};
use trackdeck_common::MediaKind;
use trackdeck_db::pool::{init_pool, DbPool};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

/// Open the SQLite catalog, creating its directory if needed.
fn open_database(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
    }
    tracing::info!("Opening catalog database at {}", path.display());
    let pool = init_pool(&path.to_string_lossy())
        .with_context(|| format!("Failed to open database: {:?}", path))?;
    Ok(pool)
}

/// The pool the configured catalog source needs, if any.
fn pool_for(config: &Config) -> Result<Option<DbPool>> {
    match config.catalog.source {
        CatalogSourceKind::Database => open_database(&config.catalog.db_path).map(Some),
        _ => Ok(None),
    }
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting trackdeck server");
    tracing::info!("Catalog source: {}", config.catalog.source);

    let db_pool = pool_for(&config)?;
    let result = server::start_server(config, db_pool.clone()).await;

    if let Some(pool) = db_pool {
        tracing::info!("Closing catalog database");
        drop(pool);
    }

    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "trackdeck=trace,trackdeck_common=debug,trackdeck_db=debug,tower_http=debug".to_string()
        } else {
            "trackdeck=info,trackdeck_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Catalog { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(show_catalog(cli.config.as_deref(), json))
        }
        Commands::Import { tracks, albums, db } => {
            import_csv(cli.config.as_deref(), &tracks, &albums, db.as_deref())
        }
        Commands::Resolve { album, track, kind } => {
            resolve_media(cli.config.as_deref(), &album, &track, kind)
        }
        Commands::Version => {
            println!("trackdeck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            match &config.media.root {
                Some(root) => println!("  Media root: {}", root.display()),
                None => println!("  Media root: (none, media endpoints disabled)"),
            }
            println!("  Catalog source: {}", config.catalog.source);
            for source_path in config.catalog.source_paths() {
                println!("    {}", source_path.display());
            }
            println!("  Probe media: {}", config.catalog.probe_media);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Catalog source: {}", config.catalog.source);
        }
    }

    Ok(())
}

async fn show_catalog(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let db_pool = pool_for(&config)?;

    let source = catalog::build_source(&config.catalog, db_pool)?;
    let mut service = CatalogService::new(source);
    if config.catalog.probe_media {
        if let Some(root) = &config.media.root {
            let root = Arc::new(MediaRoot::new(root).context("Invalid media root")?);
            service = service.with_probe(MediaProbe::new(root, &config.media));
        }
    }

    let snapshot = service
        .load()
        .await
        .with_context(|| format!("Failed to load catalog from {}", service.source_name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        let stats = &snapshot.stats;
        println!("Source: {}", service.source_name());
        println!("Tracks: {}", stats.total_tracks);
        println!("Albums: {}", snapshot.catalog.albums.len());
        println!("Audio found: {}", stats.audio_found);
        println!("Videos rendered: {}", stats.videos_rendered);
        println!("Loaded at: {}", stats.last_scan.to_rfc3339());
    }

    Ok(())
}

fn import_csv(
    config_path: Option<&Path>,
    tracks: &Path,
    albums: &Path,
    db: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let db_path = db.unwrap_or(config.catalog.db_path.as_path());

    let pool = open_database(db_path)?;
    let summary = database::import_csv(&pool, tracks, albums)
        .with_context(|| format!("Failed to import {:?} and {:?}", tracks, albums))?;

    println!(
        "Imported {} tracks and {} albums into {} ({} tracks total)",
        summary.tracks,
        summary.albums,
        db_path.display(),
        summary.total_tracks
    );
    Ok(())
}

fn resolve_media(
    config_path: Option<&Path>,
    album: &str,
    track: &str,
    kind: MediaKind,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let root = config
        .media
        .root
        .as_ref()
        .context("No media root configured")?;
    let root = MediaRoot::new(root).context("Invalid media root")?;

    let location = MediaLocation::from_segments(&[album, track], config.media.filename(kind))?;
    let path = location.resolve(&root)?;

    println!("{}", path.display());
    if !path.is_file() {
        println!("(file does not exist)");
    }
    Ok(())
}
