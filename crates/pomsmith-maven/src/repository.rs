//! Maven repository abstraction: URL layout and configuration.

use pomsmith_core::config::{CredentialEntry, GlobalConfig};

/// Maven Central base URL.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// A configured Maven repository with optional credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenRepository {
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MavenRepository {
    /// Build a repository from a configured name, base URL and credentials.
    pub fn new(name: &str, url: &str, credentials: Option<&CredentialEntry>) -> Self {
        Self {
            name: name.to_string(),
            url: url.trim_end_matches('/').to_string(),
            username: credentials.and_then(|c| c.username.clone()),
            password: credentials.and_then(|c| c.password.clone()),
        }
    }

    /// Construct the default Maven Central repository.
    pub fn maven_central() -> Self {
        Self::new("maven-central", MAVEN_CENTRAL_URL, None)
    }

    /// Every repository named in `[repositories]`, in name order, followed
    /// by Maven Central unless it is already configured.
    pub fn all_from_config(config: &GlobalConfig) -> Vec<Self> {
        let mut repos: Vec<Self> = config
            .repositories
            .iter()
            .map(|(name, url)| Self::new(name, url, config.credentials.get(name)))
            .collect();
        let central = Self::maven_central();
        if !repos.iter().any(|r| r.url == central.url) {
            repos.push(central);
        }
        repos
    }

    /// Layout path of an artifact directory.
    ///
    /// `com.google.guava:guava` becomes `com/google/guava/guava`
    pub fn artifact_path(group: &str, artifact: &str) -> String {
        format!("{}/{}", group.replace('.', "/"), artifact)
    }

    /// URL to the `maven-metadata.xml` at the artifact level (version listing).
    pub fn metadata_url(&self, group: &str, artifact: &str) -> String {
        format!(
            "{}/{}/maven-metadata.xml",
            self.url,
            Self::artifact_path(group, artifact)
        )
    }

    /// Whether this repository has authentication configured.
    pub fn has_auth(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}
