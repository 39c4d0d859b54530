//! HTTP cache control module
//!
//! Cache-Control policies that can be attached to served files.

use serde::{Deserialize, Serialize};

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public { max_age: u32 },
    /// Private cache (browser cache only)
    Private { max_age: u32 },
    /// Revalidate on every use
    NoCache,
    /// Never store
    NoStore,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public { max_age } => format!("public, max-age={max_age}"),
            Self::Private { max_age } => format!("private, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public { max_age: 3600 } // 1 hour
    }
}
