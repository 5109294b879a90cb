//! Trackdeck - catalog dashboard backend for generated music tracks
//!
//! This library crate exposes the server, catalog and streaming layers for
//! the binary and for integration testing.

pub mod catalog;
pub mod config;
pub mod server;
pub mod streaming;
