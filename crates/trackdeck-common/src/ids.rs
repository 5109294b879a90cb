//! Typed ID wrappers for catalog entities.
//!
//! Catalog identifiers come from the upstream generator (e.g. `ALB10_T01`),
//! so they wrap strings rather than UUIDs. The newtypes keep a track ID from
//! being passed where an album ID is expected.

use serde::{Deserialize, Serialize};

/// Unique identifier for a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an album.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(String);

impl AlbumId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AlbumId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AlbumId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for AlbumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_serializes_transparently() {
        let id = TrackId::new("ALB10_T01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ALB10_T01\"");

        let back: TrackId = serde_json::from_str("\"ALB10_T01\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_ids() {
        assert!(TrackId::new("   ").is_empty());
        assert!(AlbumId::new("").is_empty());
        assert!(!AlbumId::from("ALB10").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(AlbumId::from("ALB02").to_string(), "ALB02");
        assert_eq!(TrackId::from(String::from("T9")).as_str(), "T9");
    }
}
