//! Trackdeck-DB: SQLite catalog schema, migrations, and queries
//!
//! This crate backs the `database` catalog source using rusqlite with r2d2
//! connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Embedded schema migrations
//! - `pool` - Connection pool management
//! - `models` - Row types matching the schema
//! - `queries` - Album and track operations
//!
//! # Example
//!
//! ```no_run
//! use trackdeck_db::pool::{init_pool, get_conn};
//! use trackdeck_db::queries::tracks;
//!
//! let pool = init_pool("/var/lib/trackdeck/catalog.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let count = tracks::count_tracks(&conn).unwrap();
//! println!("{count} tracks in catalog");
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
