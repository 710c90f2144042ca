//! Per-session memo of resolved versions.
//!
//! Catalog retrieval is the expensive part of resolution, so once a
//! coordinate has been resolved its answer is pinned for the rest of the
//! session, even if the catalog would answer differently later.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ResolvedVersions {
    resolved: HashMap<String, String>,
}

impl ResolvedVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: &str, artifact: &str) -> Option<&str> {
        self.resolved
            .get(&format!("{group}:{artifact}"))
            .map(String::as_str)
    }

    /// Record a resolution. The first answer for a coordinate is kept.
    pub fn insert(&mut self, group: &str, artifact: &str, version: &str) -> &str {
        self.resolved
            .entry(format!("{group}:{artifact}"))
            .or_insert_with(|| version.to_string())
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
