use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trackdeck_common::MediaKind;

#[derive(Parser)]
#[command(name = "trackdeck")]
#[command(author, version, about = "Catalog dashboard backend for generated music tracks")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Load the configured catalog once and print its stats
    Catalog {
        /// Output the whole catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upsert a CSV export into the SQLite catalog
    Import {
        /// tracks.csv export
        #[arg(long)]
        tracks: PathBuf,

        /// albums.csv export
        #[arg(long)]
        albums: PathBuf,

        /// Database file (defaults to catalog.db_path from the config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show where a media request would resolve to
    Resolve {
        /// Album segment, as it would appear in the URL
        album: String,

        /// Track segment, as it would appear in the URL
        track: String,

        /// Media kind (cover, audio, video)
        #[arg(long, default_value = "audio")]
        kind: MediaKind,
    },

    /// Display version information
    Version,
}
