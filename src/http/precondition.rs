//! Conditional request evaluation (RFC 7232)
//!
//! Each of the four conditional headers is evaluated on its own; the
//! combined verdict is the maximum under the `PreconditionState` ordering,
//! so any failure vetoes success and `NotModified` beats `ShouldProcess`.

use crate::http::date::parse_http_date;
use crate::http::headers::{comma_separated_values, header_str};
use chrono::{DateTime, Utc};
use hyper::header::{HeaderName, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE};
use hyper::HeaderMap;

/// Outcome of a precondition check, ordered by precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PreconditionState {
    #[default]
    Unspecified = 0,
    NotModified = 1,
    ShouldProcess = 2,
    PreconditionFailed = 3,
}

impl PreconditionState {
    /// Whether the request may go on to range/full-body handling
    pub const fn allows_processing(self) -> bool {
        matches!(self, Self::Unspecified | Self::ShouldProcess)
    }
}

/// Per-header states for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preconditions {
    pub if_match: PreconditionState,
    pub if_none_match: PreconditionState,
    pub if_modified_since: PreconditionState,
    pub if_unmodified_since: PreconditionState,
}

impl Preconditions {
    /// Evaluate all conditional headers against the resource validators
    ///
    /// `etag` is the unquoted entity tag, `last_modified` must already be
    /// truncated to whole seconds.
    pub fn evaluate(headers: &HeaderMap, etag: &str, last_modified: DateTime<Utc>) -> Self {
        Self {
            if_match: evaluate_if_match(headers, etag),
            if_none_match: evaluate_if_none_match(headers, etag),
            if_modified_since: evaluate_if_modified_since(headers, last_modified),
            if_unmodified_since: evaluate_if_unmodified_since(headers, last_modified),
        }
    }

    /// Combined verdict, the highest of the four states
    pub fn state(&self) -> PreconditionState {
        [
            self.if_match,
            self.if_none_match,
            self.if_modified_since,
            self.if_unmodified_since,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }
}

fn list_matches(values: &[String], etag: &str) -> bool {
    values.iter().any(|v| v == "*" || v == etag)
}

fn evaluate_if_match(headers: &HeaderMap, etag: &str) -> PreconditionState {
    match comma_separated_values(headers, &IF_MATCH) {
        None => PreconditionState::Unspecified,
        Some(values) if list_matches(&values, etag) => PreconditionState::ShouldProcess,
        Some(_) => PreconditionState::PreconditionFailed,
    }
}

fn evaluate_if_none_match(headers: &HeaderMap, etag: &str) -> PreconditionState {
    match comma_separated_values(headers, &IF_NONE_MATCH) {
        None => PreconditionState::Unspecified,
        Some(values) if list_matches(&values, etag) => PreconditionState::NotModified,
        Some(_) => PreconditionState::ShouldProcess,
    }
}

fn header_date(headers: &HeaderMap, name: &HeaderName) -> Option<DateTime<Utc>> {
    header_str(headers, name).and_then(parse_http_date)
}

fn evaluate_if_modified_since(
    headers: &HeaderMap,
    last_modified: DateTime<Utc>,
) -> PreconditionState {
    match header_date(headers, &IF_MODIFIED_SINCE) {
        None => PreconditionState::Unspecified,
        Some(date) if date < last_modified => PreconditionState::ShouldProcess,
        Some(_) => PreconditionState::NotModified,
    }
}

fn evaluate_if_unmodified_since(
    headers: &HeaderMap,
    last_modified: DateTime<Utc>,
) -> PreconditionState {
    match header_date(headers, &IF_UNMODIFIED_SINCE) {
        None => PreconditionState::Unspecified,
        Some(date) if date >= last_modified => PreconditionState::ShouldProcess,
        Some(_) => PreconditionState::PreconditionFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::date::format_http_date;
    use chrono::{Duration, TimeZone};
    use hyper::header::HeaderValue;

    const ETAG: &str = "1d9a1b2c3d4e5f6";

    fn last_modified() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn headers(pairs: &[(HeaderName, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn evaluate(pairs: &[(HeaderName, String)]) -> Preconditions {
        Preconditions::evaluate(&headers(pairs), ETAG, last_modified())
    }

    #[test]
    fn test_ordering() {
        assert!(PreconditionState::Unspecified < PreconditionState::NotModified);
        assert!(PreconditionState::NotModified < PreconditionState::ShouldProcess);
        assert!(PreconditionState::ShouldProcess < PreconditionState::PreconditionFailed);
    }

    #[test]
    fn test_no_headers() {
        let result = evaluate(&[]);
        assert_eq!(result, Preconditions::default());
        assert_eq!(result.state(), PreconditionState::Unspecified);
        assert!(result.state().allows_processing());
    }

    #[test]
    fn test_if_match() {
        let quoted = format!("\"{ETAG}\"");
        assert_eq!(
            evaluate(&[(IF_MATCH, quoted)]).if_match,
            PreconditionState::ShouldProcess
        );
        assert_eq!(
            evaluate(&[(IF_MATCH, "*".to_string())]).if_match,
            PreconditionState::ShouldProcess
        );
        assert_eq!(
            evaluate(&[(IF_MATCH, "\"other\"".to_string())]).if_match,
            PreconditionState::PreconditionFailed
        );
        assert_eq!(
            evaluate(&[(IF_MATCH, format!("\"other\", \"{ETAG}\""))]).if_match,
            PreconditionState::ShouldProcess
        );
    }

    #[test]
    fn test_if_match_is_case_sensitive() {
        let upper = format!("\"{}\"", ETAG.to_uppercase());
        assert_eq!(
            evaluate(&[(IF_MATCH, upper)]).if_match,
            PreconditionState::PreconditionFailed
        );
    }

    #[test]
    fn test_if_none_match() {
        assert_eq!(
            evaluate(&[(IF_NONE_MATCH, format!("\"{ETAG}\""))]).state(),
            PreconditionState::NotModified
        );
        assert_eq!(
            evaluate(&[(IF_NONE_MATCH, "*".to_string())]).state(),
            PreconditionState::NotModified
        );
        assert_eq!(
            evaluate(&[(IF_NONE_MATCH, "\"stale\"".to_string())]).state(),
            PreconditionState::ShouldProcess
        );
    }

    #[test]
    fn test_if_modified_since() {
        let earlier = format_http_date(last_modified() - Duration::seconds(1));
        let same = format_http_date(last_modified());
        let later = format_http_date(last_modified() + Duration::hours(1));

        assert_eq!(
            evaluate(&[(IF_MODIFIED_SINCE, earlier)]).state(),
            PreconditionState::ShouldProcess
        );
        assert_eq!(
            evaluate(&[(IF_MODIFIED_SINCE, same)]).state(),
            PreconditionState::NotModified
        );
        assert_eq!(
            evaluate(&[(IF_MODIFIED_SINCE, later)]).state(),
            PreconditionState::NotModified
        );
    }

    #[test]
    fn test_if_unmodified_since() {
        let earlier = format_http_date(last_modified() - Duration::days(1));
        let same = format_http_date(last_modified());

        assert_eq!(
            evaluate(&[(IF_UNMODIFIED_SINCE, earlier)]).state(),
            PreconditionState::PreconditionFailed
        );
        assert_eq!(
            evaluate(&[(IF_UNMODIFIED_SINCE, same)]).state(),
            PreconditionState::ShouldProcess
        );
    }

    #[test]
    fn test_malformed_dates_ignored() {
        let result = evaluate(&[
            (IF_MODIFIED_SINCE, "not a date".to_string()),
            (IF_UNMODIFIED_SINCE, "2024-03-01".to_string()),
        ]);
        assert_eq!(result.if_modified_since, PreconditionState::Unspecified);
        assert_eq!(result.if_unmodified_since, PreconditionState::Unspecified);
        assert_eq!(result.state(), PreconditionState::Unspecified);
    }

    #[test]
    fn test_failure_vetoes_not_modified() {
        let result = evaluate(&[
            (IF_NONE_MATCH, format!("\"{ETAG}\"")),
            (IF_MATCH, "\"other\"".to_string()),
        ]);
        assert_eq!(result.if_none_match, PreconditionState::NotModified);
        assert_eq!(result.state(), PreconditionState::PreconditionFailed);
    }

    #[test]
    fn test_should_process_outranks_not_modified() {
        let result = evaluate(&[
            (IF_MATCH, "*".to_string()),
            (IF_NONE_MATCH, format!("\"{ETAG}\"")),
        ]);
        assert_eq!(result.state(), PreconditionState::ShouldProcess);

        let result = evaluate(&[
            (IF_NONE_MATCH, format!("\"{ETAG}\"")),
            (IF_MODIFIED_SINCE, format_http_date(last_modified())),
        ]);
        assert_eq!(result.state(), PreconditionState::NotModified);
    }

    #[test]
    fn test_state_is_order_independent_max() {
        let states = [
            PreconditionState::Unspecified,
            PreconditionState::NotModified,
            PreconditionState::ShouldProcess,
            PreconditionState::PreconditionFailed,
        ];
        for a in states {
            for b in states {
                for c in states {
                    for d in states {
                        let combined = Preconditions {
                            if_match: a,
                            if_none_match: b,
                            if_modified_since: c,
                            if_unmodified_since: d,
                        };
                        let expected = a.max(b).max(c).max(d);
                        assert_eq!(combined.state(), expected);
                    }
                }
            }
        }
    }
}
