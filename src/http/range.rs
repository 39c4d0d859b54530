//! HTTP Range request parsing module
//!
//! Range header parsing and normalization, compliant with RFC 7233.
//! Parsing is purely syntactic; normalization resolves open-ended and
//! suffix forms against the resource length.

/// One `byte-range-spec` as written by the client
///
/// `start` only is `N-`, `end` only is the suffix form `-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// A normalized byte range, absolute and inclusive: `start <= end < length`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by this range
    #[inline]
    pub const fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a Range header into its byte-range-specs
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes
///
/// Any syntax error anywhere in the set rejects the whole header.
///
/// # Examples
/// ```
/// use static_range::http::range::parse_ranges;
///
/// let ranges = parse_ranges("bytes=0-99, 200-").unwrap();
/// assert_eq!(ranges.len(), 2);
/// assert!(parse_ranges("items=0-99").is_none());
/// ```
pub fn parse_ranges(header: &str) -> Option<Vec<RangeSpec>> {
    let header = header.trim();
    let unit = header.get(..6)?;
    if !unit.eq_ignore_ascii_case("bytes=") {
        return None;
    }

    let set: String = header[6..].chars().filter(|c| *c != ' ').collect();
    let ranges = set
        .split(',')
        .map(parse_spec)
        .collect::<Option<Vec<_>>>()?;

    if ranges.is_empty() {
        None
    } else {
        Some(ranges)
    }
}

fn parse_spec(spec: &str) -> Option<RangeSpec> {
    let (first, last) = spec.split_once('-')?;
    match (first.is_empty(), last.is_empty()) {
        // "-500": last 500 bytes
        (true, _) => Some(RangeSpec {
            start: None,
            end: Some(parse_position(last)?),
        }),
        // "500-": from 500 to the end
        (false, true) => Some(RangeSpec {
            start: Some(parse_position(first)?),
            end: None,
        }),
        // "0-499"
        (false, false) => Some(RangeSpec {
            start: Some(parse_position(first)?),
            end: Some(parse_position(last)?),
        }),
    }
}

/// Digits only, no sign or whitespace
fn parse_position(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Resolve one spec against the resource length
///
/// Returns `None` when the spec cannot be satisfied: a start at or past
/// the end, an inverted pair, a zero suffix, or an empty resource.
pub fn normalize_range(spec: RangeSpec, length: u64) -> Option<ByteRange> {
    if length == 0 {
        return None;
    }

    match (spec.start, spec.end) {
        (Some(start), end) => {
            if start >= length {
                return None;
            }
            let end = match end {
                Some(end) if end < start => return None,
                Some(end) => end.min(length - 1),
                None => length - 1,
            };
            Some(ByteRange { start, end })
        }
        (None, Some(suffix)) => {
            if suffix == 0 {
                return None;
            }
            let bytes = suffix.min(length);
            Some(ByteRange {
                start: length - bytes,
                end: length - 1,
            })
        }
        (None, None) => None,
    }
}

/// Content-Range value for a partial response
pub fn content_range(range: ByteRange, length: u64) -> String {
    format!("bytes {}-{}/{length}", range.start, range.end)
}

/// Content-Range value for a 416 response
pub fn unsatisfied_content_range(length: u64) -> String {
    format!("bytes */{length}")
}
