use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default Maven packaging type when none is declared.
pub const DEFAULT_TYPE: &str = "jar";

/// Maven-compatible dependency scope.
///
/// The declaration order doubles as the canonical sort order of
/// `<dependency>` elements inside `<dependencies>`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl DependencyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }

    /// Lenient lookup used when reading existing manifests: anything
    /// unrecognised sorts as `compile`.
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for DependencyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compile" => Ok(Self::Compile),
            "provided" => Ok(Self::Provided),
            "runtime" => Ok(Self::Runtime),
            "test" => Ok(Self::Test),
            "system" => Ok(Self::System),
            "import" => Ok(Self::Import),
            other => Err(format!("unknown dependency scope '{other}'")),
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity of a dependency: group, artifact and the optional type and
/// classifier that distinguish variants of the same artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub type_: Option<String>,
    pub classifier: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            type_: None,
            classifier: None,
        }
    }

    pub fn with_type(mut self, type_: Option<String>) -> Self {
        self.type_ = type_;
        self
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The declared type, or `jar` when absent.
    pub fn effective_type(&self) -> &str {
        self.type_.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    /// `group:artifact`, the key used for catalogs and session caches.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if self.type_.is_some() || self.classifier.is_some() {
            write!(f, ":{}", self.effective_type())?;
        }
        if let Some(ref classifier) = self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// A dependency as typed on the command line: `group:artifact[:version]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl DependencySpec {
    /// Parse `"group:artifact"` or `"group:artifact:version"`.
    ///
    /// The version part may itself be a range such as `[1.0,2.0)`, so only
    /// the first two colons split the string.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let group_id = parts.next().filter(|p| !p.is_empty())?;
        let artifact_id = parts.next().filter(|p| !p.is_empty())?;
        let version = match parts.next() {
            Some("") => return None,
            Some(v) => Some(v.to_string()),
            None => None,
        };
        Some(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version,
        })
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(ref v) = self.version {
            write!(f, ":{v}")?;
        }
        Ok(())
    }
}

/// A dependency entry ready to be written into a build manifest.
///
/// Built once per insertion request and never mutated after placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub coordinate: Coordinate,
    /// `None` when a managing declaration already pins the version.
    pub version: Option<String>,
    pub scope: Option<DependencyScope>,
    pub optional: bool,
}

impl DependencyDeclaration {
    pub fn effective_scope(&self) -> DependencyScope {
        self.scope.unwrap_or_default()
    }

    /// The scope to write out; `compile` is the Maven default and is omitted.
    pub fn written_scope(&self) -> Option<DependencyScope> {
        self.scope.filter(|s| *s != DependencyScope::Compile)
    }
}
