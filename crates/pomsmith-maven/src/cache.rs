//! Local metadata cache mirroring repository layout.
//!
//! Layout: `<root>/<group path>/<artifact>/maven-metadata.xml`, holding the
//! merged version listing of every repository that publishes the artifact.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use pomsmith_util::errors::PomsmithError;

use crate::repository::MavenRepository;

const METADATA_FILE: &str = "maven-metadata.xml";

/// How long a cached listing is trusted while online.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct MetadataCache {
    root: PathBuf,
}

impl MetadataCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the cached listing for `group:artifact`.
    pub fn metadata_path(&self, group: &str, artifact: &str) -> PathBuf {
        self.root
            .join(MavenRepository::artifact_path(group, artifact))
            .join(METADATA_FILE)
    }

    /// The cached listing, if present. With `max_age`, entries older than
    /// that are treated as missing.
    pub fn get(&self, group: &str, artifact: &str, max_age: Option<Duration>) -> Option<String> {
        let path = self.metadata_path(group, artifact);
        if let Some(max_age) = max_age {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or_default();
            if age > max_age {
                tracing::debug!("{} is stale ({}s old)", path.display(), age.as_secs());
                return None;
            }
        }
        fs::read_to_string(&path).ok()
    }

    /// Store a listing, creating directories as needed.
    pub fn put(&self, group: &str, artifact: &str, xml: &str) -> Result<PathBuf, PomsmithError> {
        let path = self.metadata_path(group, artifact);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, xml)?;
        Ok(path)
    }
}
