//! Published versions from remote repositories, through the local metadata
//! cache.

use std::time::Duration;

use reqwest::blocking::Client;

use pomsmith_core::config::GlobalConfig;
use pomsmith_resolver::source::VersionCatalog;
use pomsmith_util::errors::PomsmithError;
use pomsmith_util::progress;

use crate::cache::{MetadataCache, DEFAULT_MAX_AGE};
use crate::download;
use crate::metadata::{self, MavenMetadata};
use crate::repository::MavenRepository;

/// Version catalog backed by `maven-metadata.xml` listings.
///
/// Online, a fresh cache entry is used as-is; otherwise every repository is
/// asked and the union of their listings is cached. Offline, only the cache
/// is consulted and a miss yields an empty catalog.
pub struct RemoteCatalog {
    repositories: Vec<MavenRepository>,
    cache: MetadataCache,
    client: Option<Client>,
    max_age: Duration,
}

impl RemoteCatalog {
    pub fn new(
        repositories: Vec<MavenRepository>,
        cache: MetadataCache,
        offline: bool,
    ) -> Result<Self, PomsmithError> {
        let client = if offline {
            None
        } else {
            Some(download::build_client()?)
        };
        Ok(Self {
            repositories,
            cache,
            client,
            max_age: DEFAULT_MAX_AGE,
        })
    }

    /// Repositories, credentials and cache location from the global config.
    pub fn from_config(config: &GlobalConfig, offline: bool) -> Result<Self, PomsmithError> {
        Self::new(
            MavenRepository::all_from_config(config),
            MetadataCache::new(config.cache.resolved_dir()),
            offline,
        )
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    fn fetch(
        &self,
        client: &Client,
        group: &str,
        artifact: &str,
    ) -> Result<MavenMetadata, PomsmithError> {
        let pb = progress::spinner(&format!("Fetching versions of {group}:{artifact}"));
        let mut merged = MavenMetadata {
            group_id: Some(group.to_string()),
            artifact_id: Some(artifact.to_string()),
            ..Default::default()
        };
        let mut found = false;

        for repo in &self.repositories {
            let url = repo.metadata_url(group, artifact);
            tracing::debug!("fetching {url}");
            let Some(xml) = download::download_text(client, repo, &url)? else {
                continue;
            };
            let listing = metadata::parse_metadata(&xml)?;
            tracing::debug!(
                "{} lists {} versions of {group}:{artifact}",
                repo.name,
                listing.versions.len()
            );
            merged.merge(listing);
            found = true;
        }
        pb.finish_and_clear();

        if found {
            self.cache.put(group, artifact, &merged.to_xml())?;
        } else {
            tracing::warn!("{group}:{artifact} was not found in any repository");
        }
        Ok(merged)
    }
}

impl VersionCatalog for RemoteCatalog {
    fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>, PomsmithError> {
        let Some(client) = &self.client else {
            return match self.cache.get(group_id, artifact_id, None) {
                Some(xml) => Ok(metadata::parse_metadata(&xml)?.versions),
                None => {
                    tracing::warn!(
                        "{group_id}:{artifact_id} is not cached; offline catalog is empty"
                    );
                    Ok(Vec::new())
                }
            };
        };

        if let Some(xml) = self.cache.get(group_id, artifact_id, Some(self.max_age)) {
            tracing::debug!("{group_id}:{artifact_id}: using cached metadata");
            return Ok(metadata::parse_metadata(&xml)?.versions);
        }
        Ok(self.fetch(client, group_id, artifact_id)?.versions)
    }
}
