//! HTTP `Range` header parsing.
//!
//! Only the single-range form `bytes=<start>-[<end>]` is understood. When a
//! client sends several comma-separated ranges, the first one is honoured and
//! the rest are ignored; no multipart responses are produced.

use crate::error::{Error, Result};

/// A concrete, satisfiable byte interval (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total_size: u64,
}

impl ByteRange {
    /// Number of bytes in the interval.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false: a satisfiable range holds at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}

/// What a request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedRange {
    /// No `Range` header: the whole resource.
    Full { total_size: u64 },
    /// A single partial interval.
    Partial(ByteRange),
}

impl RequestedRange {
    /// Inclusive `(start, end)` bounds, or `None` for an empty resource.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        match self {
            Self::Full { total_size: 0 } => None,
            Self::Full { total_size } => Some((0, total_size - 1)),
            Self::Partial(r) => Some((r.start, r.end)),
        }
    }

    /// Number of body bytes a response carries.
    pub fn content_length(&self) -> u64 {
        match self {
            Self::Full { total_size } => *total_size,
            Self::Partial(r) => r.len(),
        }
    }
}

/// Interpret an optional `Range` header against a resource of `total_size`
/// bytes.
pub fn parse(header: Option<&str>, total_size: u64) -> Result<RequestedRange> {
    let Some(raw) = header else {
        return Ok(RequestedRange::Full { total_size });
    };

    let malformed = || Error::MalformedRange {
        header: raw.to_string(),
        total_size,
    };

    let spec = raw.trim().strip_prefix("bytes=").ok_or_else(malformed)?;

    // Multi-range: keep the first component only.
    let first = spec.split(',').next().unwrap_or_default().trim();

    let (start_str, end_str) = first.split_once('-').ok_or_else(malformed)?;
    let start_str = start_str.trim();
    let end_str = end_str.trim();

    if start_str.is_empty() {
        return Err(malformed());
    }
    let start: u64 = start_str.parse().map_err(|_| malformed())?;

    let end: u64 = if end_str.is_empty() {
        if total_size == 0 {
            return Err(Error::RangeNotSatisfiable {
                start,
                end: 0,
                total_size,
            });
        }
        total_size - 1
    } else {
        end_str.parse().map_err(|_| malformed())?
    };

    if start > end || end >= total_size {
        return Err(Error::RangeNotSatisfiable {
            start,
            end,
            total_size,
        });
    }

    Ok(RequestedRange::Partial(ByteRange {
        start,
        end,
        total_size,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(r: RequestedRange) -> ByteRange {
        match r {
            RequestedRange::Partial(b) => b,
            other => panic!("expected partial range, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_header_is_full() {
        let r = parse(None, 1000).unwrap();
        assert_eq!(r, RequestedRange::Full { total_size: 1000 });
        assert_eq!(r.bounds(), Some((0, 999)));
        assert_eq!(r.content_length(), 1000);
    }

    #[test]
    fn test_closed_range() {
        let r = partial(parse(Some("bytes=100-199"), 1000).unwrap());
        assert_eq!(
            r,
            ByteRange {
                start: 100,
                end: 199,
                total_size: 1000
            }
        );
        assert_eq!(r.len(), 100);
        assert_eq!(r.content_range(), "bytes 100-199/1000");
    }

    #[test]
    fn test_open_ended_range() {
        let r = partial(parse(Some("bytes=500-"), 1000).unwrap());
        assert_eq!((r.start, r.end), (500, 999));
    }

    #[test]
    fn test_upper_boundary() {
        let r = partial(parse(Some("bytes=900-999"), 1000).unwrap());
        assert_eq!(r.len(), 100);

        let r = partial(parse(Some("bytes=999-999"), 1000).unwrap());
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_past_the_end_is_unsatisfiable() {
        for header in ["bytes=1000-1000", "bytes=1000-", "bytes=0-1000", "bytes=200-100"] {
            let err = parse(Some(header), 1000).unwrap_err();
            assert!(
                matches!(err, Error::RangeNotSatisfiable { total_size: 1000, .. }),
                "{header} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_malformed_headers() {
        for header in [
            "bytes=abc-def",
            "bytes=-500",
            "bytes=-",
            "bytes=10",
            "items=0-10",
            "0-10",
            "bytes=1-2-3",
        ] {
            let err = parse(Some(header), 1000).unwrap_err();
            assert!(
                matches!(err, Error::MalformedRange { total_size: 1000, .. }),
                "{header} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_multi_range_honours_first() {
        let r = partial(parse(Some("bytes=0-10,20-30"), 1000).unwrap());
        assert_eq!((r.start, r.end), (0, 10));

        let err = parse(Some("bytes=0-2000, 0-10"), 1000).unwrap_err();
        assert!(matches!(err, Error::RangeNotSatisfiable { .. }));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let r = partial(parse(Some(" bytes= 5 - 9 "), 10).unwrap());
        assert_eq!((r.start, r.end), (5, 9));
    }

    #[test]
    fn test_empty_resource() {
        let r = parse(None, 0).unwrap();
        assert_eq!(r.bounds(), None);
        assert_eq!(r.content_length(), 0);

        assert!(matches!(
            parse(Some("bytes=0-"), 0),
            Err(Error::RangeNotSatisfiable { total_size: 0, .. })
        ));
        assert!(matches!(
            parse(Some("bytes=0-0"), 0),
            Err(Error::RangeNotSatisfiable { total_size: 0, .. })
        ));
    }
}
