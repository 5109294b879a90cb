//! Media path resolution.
//!
//! Request segments are untrusted. [`resolve`] turns them into a path under a
//! [`MediaRoot`] and refuses anything that would land outside it, however the
//! segments are encoded. Containment is checked component-wise on canonical
//! paths, so a sibling such as `/data/songs2` never passes for a root of
//! `/data/songs`.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Number of request segments that address a track's media (album, track).
pub const REQUIRED_SEGMENTS: usize = 2;

/// Upper bound on percent-decoding passes for a single segment.
const MAX_DECODE_PASSES: usize = 4;

/// A validated, canonical media root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRoot {
    canonical: PathBuf,
}

impl MediaRoot {
    /// Validate `path` as a media root.
    ///
    /// The path must be absolute and name an existing directory. The stored
    /// form is canonical so containment checks compare like with like.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(Error::validation(format!(
                "media root must be an absolute path: {}",
                path.display()
            )));
        }

        let canonical = std::fs::canonicalize(path).map_err(|e| {
            Error::validation(format!(
                "media root {} is not accessible: {e}",
                path.display()
            ))
        })?;

        if !canonical.is_dir() {
            return Err(Error::validation(format!(
                "media root is not a directory: {}",
                path.display()
            )));
        }

        Ok(Self { canonical })
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.canonical
    }

    /// Whether `candidate` is strictly below the root.
    ///
    /// `candidate` must already be canonical. The root itself is not
    /// contained: there has to be a non-empty remainder.
    pub fn contains(&self, candidate: &Path) -> bool {
        match candidate.strip_prefix(&self.canonical) {
            Ok(rest) => {
                let mut components = rest.components().peekable();
                components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
            }
            Err(_) => false,
        }
    }
}

/// Percent-decode a segment exactly once.
///
/// The once-decoded value is the name on disk, so a literal `100%41` stays
/// addressable as `100%2541`. Deeper encoding layers are still decoded and
/// each one must be a plain name: `%252e%252e` is rejected because it ends
/// up as `..`.
pub fn decode_segment(raw: &str) -> Result<String> {
    let once = urlencoding::decode(raw)
        .map_err(|_| Error::invalid_path("segment is not valid UTF-8 once decoded"))?
        .into_owned();

    let mut current = once.clone();
    for _ in 0..MAX_DECODE_PASSES {
        // A deeper layer that is not UTF-8 cannot be a traversal token.
        let Ok(decoded) = urlencoding::decode(&current) else {
            return Ok(once);
        };
        if decoded == current {
            return Ok(once);
        }
        if validate_segment(&decoded).is_err() {
            return Err(Error::access_denied(format!(
                "segment {raw:?} decodes to {decoded:?}"
            )));
        }
        current = decoded.into_owned();
    }
    Err(Error::access_denied(format!(
        "segment {raw:?} is percent-encoded more than {MAX_DECODE_PASSES} times"
    )))
}

/// Check that a decoded segment is a plain file or directory name.
///
/// Anything that is not its own basename (separators, `.`/`..`, drive
/// prefixes, absolute forms, NUL) is an escape attempt.
pub fn validate_segment(segment: &str) -> Result<&str> {
    if segment.trim().is_empty() {
        return Err(Error::invalid_path("empty path segment"));
    }

    if segment.contains(['/', '\\', '\0']) {
        return Err(Error::access_denied(format!(
            "path segment {segment:?} contains a separator"
        )));
    }

    let as_path = Path::new(segment);
    let mut components = as_path.components();
    let is_plain_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == OsStr::new(segment)
    );
    if !is_plain_name || as_path.file_name() != Some(OsStr::new(segment)) {
        return Err(Error::access_denied(format!(
            "path segment {segment:?} is not a plain name"
        )));
    }

    Ok(segment)
}

/// Resolve untrusted `segments` to an absolute path under `root`.
///
/// Each segment is percent-decoded and validated, the segments are joined onto
/// the root, and the result is canonicalised (see [`canonicalize_lenient`]).
/// The canonical path must be strictly inside the root. Existence of the
/// final path is not checked.
pub fn resolve<S: AsRef<str>>(root: &MediaRoot, segments: &[S]) -> Result<PathBuf> {
    if segments.is_empty() {
        return Err(Error::invalid_path("no path segments supplied"));
    }

    let decoded = segments
        .iter()
        .map(|raw| decode_segment(raw.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    resolve_decoded(root, &decoded)
}

/// Like [`resolve`], for segments that are already percent-decoded.
pub fn resolve_decoded<S: AsRef<str>>(root: &MediaRoot, segments: &[S]) -> Result<PathBuf> {
    if segments.is_empty() {
        return Err(Error::invalid_path("no path segments supplied"));
    }

    let mut joined = root.path().to_path_buf();
    for segment in segments {
        joined.push(validate_segment(segment.as_ref())?);
    }

    let canonical = canonicalize_lenient(&joined)?;
    if !root.contains(&canonical) {
        return Err(Error::access_denied(format!(
            "{} resolves outside the media root",
            joined.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalise a path whose tail may not exist yet.
///
/// The deepest existing ancestor is canonicalised (resolving symlinks) and
/// the missing components are appended unchanged.
pub fn canonicalize_lenient(path: &Path) -> Result<PathBuf> {
    for ancestor in path.ancestors() {
        match std::fs::canonicalize(ancestor) {
            Ok(canonical) => {
                let tail = path
                    .strip_prefix(ancestor)
                    .map_err(|e| Error::internal(format!("ancestor prefix mismatch: {e}")))?;
                // Joining an empty tail would append a trailing separator.
                if tail.as_os_str().is_empty() {
                    return Ok(canonical);
                }
                return Ok(canonical.join(tail));
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                continue
            }
            Err(e) => return Err(Error::from(e)),
        }
    }
    Err(Error::invalid_path(format!(
        "no existing ancestor for {}",
        path.display()
    )))
}

/// Logical address of one media file: album directory, track directory and
/// the kind's fixed file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocation {
    pub album: String,
    pub track: String,
    pub filename: String,
}

impl MediaLocation {
    /// Build a location from raw request segments.
    ///
    /// Exactly [`REQUIRED_SEGMENTS`] segments are accepted; they are decoded
    /// and validated here so errors surface before touching the filesystem.
    pub fn from_segments<S: AsRef<str>>(
        segments: &[S],
        filename: impl Into<String>,
    ) -> Result<Self> {
        if segments.len() < REQUIRED_SEGMENTS {
            return Err(Error::invalid_path(format!(
                "expected album and track segments, got {}",
                segments.len()
            )));
        }
        if segments.len() > REQUIRED_SEGMENTS {
            return Err(Error::invalid_path(format!(
                "expected album and track segments, got {} segments",
                segments.len()
            )));
        }

        let album = decode_segment(segments[0].as_ref())?;
        let track = decode_segment(segments[1].as_ref())?;
        validate_segment(&album)?;
        validate_segment(&track)?;

        Ok(Self {
            album,
            track,
            filename: filename.into(),
        })
    }

    /// Resolve this location under `root`.
    pub fn resolve(&self, root: &MediaRoot) -> Result<PathBuf> {
        resolve_decoded(root, &[&self.album, &self.track, &self.filename])
    }
}

impl std::fmt::Display for MediaLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.album, self.track, self.filename)
    }
}
