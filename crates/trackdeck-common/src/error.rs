//! Common error types used throughout trackdeck.
//!
//! Every failure in media resolution, range parsing, streaming and catalog
//! loading funnels into [`Error`], which carries enough context for the HTTP
//! layer to pick a status code ([`Error::http_status`]) and a log level
//! ([`Error::log_level`]).

use std::fmt;

use tracing::Level;

/// Common error type for trackdeck.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request did not carry the segments needed to address media.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A resolved path would escape the configured media root.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The requested entity or file does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "audio", "track").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The `Range` header could not be parsed.
    #[error("Malformed range header: {header:?}")]
    MalformedRange {
        /// The raw header value.
        header: String,
        /// Size of the addressed resource.
        total_size: u64,
    },

    /// The requested interval lies outside the resource.
    #[error("Range not satisfiable: bytes {start}-{end} of {total_size}")]
    RangeNotSatisfiable {
        /// Requested first byte.
        start: u64,
        /// Requested last byte (inclusive).
        end: u64,
        /// Size of the addressed resource.
        total_size: u64,
    },

    /// An I/O operation on an existing file failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A catalog source was configured but could not produce a catalog.
    #[error("Catalog source '{source_name}' failed: {message}")]
    Catalog {
        /// Name of the failing source (e.g. "csv").
        source_name: String,
        /// Human-readable error description.
        message: String,
    },

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration or input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidPath(_) => 400,
            Error::Validation(_) => 400,
            Error::AccessDenied(_) => 403,
            Error::NotFound { .. } => 404,
            Error::MalformedRange { .. } => 416,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Io { .. } => 500,
            Error::Catalog { .. } => 500,
            Error::Database(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidPath(_) => "invalid_path",
            Error::AccessDenied(_) => "access_denied",
            Error::NotFound { .. } => "not_found",
            Error::MalformedRange { .. } => "malformed_range",
            Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            Error::Io { .. } => "io_error",
            Error::Catalog { .. } => "catalog_error",
            Error::Database(_) => "database_error",
            Error::Validation(_) => "validation_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Level at which the HTTP layer records this error.
    ///
    /// Missing media is an expected condition and stays at debug. Escapes
    /// from the media root are security events. Everything that maps to a
    /// 5xx is an application error.
    pub fn log_level(&self) -> Level {
        match self {
            Error::AccessDenied(_) => Level::WARN,
            Error::NotFound { .. } | Error::InvalidPath(_) | Error::Validation(_) => Level::DEBUG,
            Error::MalformedRange { .. } | Error::RangeNotSatisfiable { .. } => Level::DEBUG,
            Error::Io { .. } | Error::Catalog { .. } | Error::Database(_) | Error::Internal(_) => {
                Level::ERROR
            }
        }
    }

    /// Resource size to advertise in `Content-Range: bytes */N` on a 416.
    pub fn unsatisfiable_size(&self) -> Option<u64> {
        match self {
            Error::MalformedRange { total_size, .. }
            | Error::RangeNotSatisfiable { total_size, .. } => Some(*total_size),
            _ => None,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::InvalidPath`].
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Convenience constructor for [`Error::AccessDenied`].
    pub fn access_denied<S: Into<String>>(msg: S) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Convenience constructor for [`Error::Catalog`].
    pub fn catalog(source_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Catalog {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
