//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RunId`] - Unique identifier for one pipeline run
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Examples
//!
//! ```
//! use gantry::core::types::{RunId, UtcTimestamp};
//!
//! let id = RunId::new();
//! assert!(!id.as_str().is_empty());
//!
//! let ts = UtcTimestamp::now();
//! assert!(ts.to_string().contains('T'));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a single pipeline run.
///
/// Used to correlate a run report with the CI job that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a fresh run id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Construct from an existing string (used in tests).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RFC3339 UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Current time.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
