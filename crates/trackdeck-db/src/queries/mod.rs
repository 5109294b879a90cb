//! Database query modules.
//!
//! - albums: album upserts and listing
//! - tracks: track upserts, listing, counts and media flags
//! - import: transactional batch upsert of a whole export

pub mod albums;
pub mod import;
pub mod tracks;
