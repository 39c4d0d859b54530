//! Method and path gate
//!
//! Decides whether a request is one the static file engine handles at all.

use hyper::Method;

/// The read methods the engine serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Head,
}

impl RequestMethod {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::HEAD => Some(Self::Head),
            _ => None,
        }
    }
}

/// Match `path` against the segment prefix and return the remaining sub-path
///
/// `/static` matches `/static` and `/static/...` (ASCII case-insensitive)
/// but not `/staticfoo`. The sub-path keeps its leading `/`. An empty or
/// `/` prefix matches everything.
pub fn match_path<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return Some(path);
    }

    let head = path.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let rest = &path[prefix.len()..];
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}
