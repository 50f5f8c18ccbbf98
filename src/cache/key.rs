use serde::Serialize;
use std::fmt;

/// Hierarchical cache key, e.g. `meals/byDate/2026-01-11`.
///
/// Keys are compared segment by segment, so a shorter key acts as a prefix
/// selecting a whole family of entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Appends a filter struct as a single canonical JSON segment.
    ///
    /// Field order follows the struct definition and absent options are
    /// skipped by the models, so equal filters always produce equal keys.
    #[must_use]
    pub fn with_params<P: Serialize>(&self, params: &P) -> Self {
        let segment = serde_json::to_string(params).unwrap_or_else(|_| "null".to_string());
        self.join(segment)
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
