//! Collaborators the resolver consumes but does not own: where published
//! versions come from, which versions a managing layer already pins, and
//! which dependencies are already declared.

use pomsmith_core::dependency::Coordinate;
use pomsmith_util::errors::PomsmithError;

/// Supplies the published versions of an artifact. Implementations may
/// perform network I/O.
pub trait VersionCatalog {
    fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>, PomsmithError>;
}

impl<F> VersionCatalog for F
where
    F: Fn(&str, &str) -> Result<Vec<String>, PomsmithError>,
{
    fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>, PomsmithError> {
        self(group_id, artifact_id)
    }
}

/// Reports a version already bound by a managing declaration, such as a
/// `<dependencyManagement>` entry.
pub trait ManagedVersions {
    fn managed_version(&self, coordinate: &Coordinate) -> Option<String>;
}

/// A dependency already declared in the document being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingDependency {
    pub group_id: String,
    pub artifact_id: String,
    /// The version text exactly as written, e.g. `${jackson.version}`.
    pub requested: Option<String>,
    /// The version after property interpolation.
    pub resolved: Option<String>,
}
