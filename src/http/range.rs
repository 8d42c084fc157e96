//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 7233) for partial bundle downloads.

/// Resolved byte span, both ends inclusive and within the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the span
    #[inline]
    pub const fn len(self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a file of `total` bytes
    pub fn content_range(self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header evaluation against a concrete file size
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve only this span with 206
    Partial(ByteRange),
    /// Syntactically valid but outside the file, answer 416
    NotSatisfiable,
    /// No Range header, another unit, multi-range or malformed: serve everything
    Full,
}

/// Evaluate an HTTP Range header (single range only, bytes unit)
///
/// Supported formats:
/// - `bytes=start-end` - Specific range, end clamped to the file
/// - `bytes=start-` - From start to end of file
/// - `bytes=-suffix` - Last suffix bytes
///
/// # Examples
/// ```
/// use wasm_cache_server::http::range::{evaluate_range, ByteRange, RangeOutcome};
///
/// let outcome = evaluate_range(Some("bytes=0-99"), 1000);
/// assert_eq!(outcome, RangeOutcome::Partial(ByteRange { start: 0, end: 99 }));
///
/// assert_eq!(evaluate_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn evaluate_range(range_header: Option<&str>, file_size: u64) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        suffix_range(end_str, file_size)
    } else {
        bounded_range(start_str, end_str, file_size)
    }
}

/// `bytes=-N`: the final N bytes
fn suffix_range(suffix_str: &str, file_size: u64) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<u64>() else {
        return RangeOutcome::Full;
    };

    if suffix == 0 || file_size == 0 {
        return RangeOutcome::NotSatisfiable;
    }

    RangeOutcome::Partial(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

/// `bytes=A-` or `bytes=A-B`
fn bounded_range(start_str: &str, end_str: &str, file_size: u64) -> RangeOutcome {
    let Ok(start) = start_str.parse::<u64>() else {
        return RangeOutcome::Full;
    };

    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        let Ok(e) = end_str.parse::<u64>() else {
            return RangeOutcome::Full;
        };
        if e < start {
            return RangeOutcome::Full;
        }
        e.min(file_size - 1)
    };

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: u64, end: u64) -> RangeOutcome {
        RangeOutcome::Partial(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(evaluate_range(None, 100), RangeOutcome::Full);
        assert_eq!(evaluate_range(Some("items=0-5"), 100), RangeOutcome::Full);
    }

    #[test]
    fn test_bounded_range() {
        assert_eq!(evaluate_range(Some("bytes=0-9"), 100), partial(0, 9));
        // End past EOF is clamped
        assert_eq!(evaluate_range(Some("bytes=90-500"), 100), partial(90, 99));
    }

    #[test]
    fn test_open_range() {
        let outcome = evaluate_range(Some("bytes=50-"), 100);
        assert_eq!(outcome, partial(50, 99));
        if let RangeOutcome::Partial(r) = outcome {
            assert_eq!(r.len(), 50);
            assert_eq!(r.content_range(100), "bytes 50-99/100");
        }
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(evaluate_range(Some("bytes=-20"), 100), partial(80, 99));
        // Suffix larger than the file covers all of it
        assert_eq!(evaluate_range(Some("bytes=-500"), 100), partial(0, 99));
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            evaluate_range(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            evaluate_range(Some("bytes=-0"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            evaluate_range(Some("bytes=0-"), 0),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_is_ignored() {
        assert_eq!(evaluate_range(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(
            evaluate_range(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Full
        );
        assert_eq!(evaluate_range(Some("bytes=9-3"), 100), RangeOutcome::Full);
        assert_eq!(evaluate_range(Some("bytes=5"), 100), RangeOutcome::Full);
    }
}
