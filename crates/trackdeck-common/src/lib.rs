//! Trackdeck-Common: shared types and the pure parts of media serving.
//!
//! - **Typed IDs**: string-backed wrappers for track and album identifiers
//! - **Catalog types**: [`Track`], [`Album`], [`CatalogStats`], [`MediaKind`]
//! - **Path resolution**: [`paths::resolve`] keeps request segments inside a
//!   [`paths::MediaRoot`]
//! - **Range parsing**: [`range::parse`] turns a `Range` header into a
//!   concrete byte interval
//! - **Error handling**: the shared [`Error`] type and [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use trackdeck_common::range::{self, RequestedRange};
//! use trackdeck_common::parse_tags;
//!
//! let r = range::parse(Some("bytes=100-199"), 1000).unwrap();
//! assert!(matches!(r, RequestedRange::Partial(b) if b.len() == 100));
//!
//! assert_eq!(parse_tags("A|B| C |"), vec!["A", "B", "C"]);
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod range;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
