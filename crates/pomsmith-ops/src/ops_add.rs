//! Operation: add a dependency to a `pom.xml`.

use std::path::Path;

use pomsmith_core::config::GlobalConfig;
use pomsmith_core::dependency::{Coordinate, DependencyScope};
use pomsmith_maven::catalog::RemoteCatalog;
use pomsmith_maven::editor::{AddOutcome, DependencyAddition, PomEditor};
use pomsmith_resolver::session::{FamilyPattern, VersionRequest, VersionResolver, LATEST_RELEASE};
use pomsmith_resolver::source::VersionCatalog;
use pomsmith_util::errors::PomsmithResult;

/// Options for `pomsmith add`.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// The dependency spec: `group:artifact[:version]`.
    pub spec: String,
    pub scope: Option<DependencyScope>,
    pub type_: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
    /// Regular expression over whole group ids whose existing version the new
    /// entry adopts.
    pub family: Option<String>,
    /// Overrides `[resolve] releases-only` when set.
    pub releases_only: Option<bool>,
    pub version_pattern: Option<String>,
    /// Written when a range matches no published version.
    pub fallback_version: Option<String>,
    pub offline: bool,
}

impl AddOptions {
    /// Turn the options into what the editor consumes.
    pub fn to_addition(&self, config: &GlobalConfig) -> PomsmithResult<DependencyAddition> {
        let spec = crate::parse_spec(&self.spec)?;
        let coordinate = Coordinate::new(spec.group_id, spec.artifact_id)
            .with_type(self.type_.clone())
            .with_classifier(self.classifier.clone());
        let family = self.family.as_deref().map(FamilyPattern::new).transpose()?;

        let request = VersionRequest::new(
            coordinate,
            spec.version.as_deref().unwrap_or(LATEST_RELEASE),
        )
        .with_family(family)
        .releases_only(self.releases_only.unwrap_or(config.resolve.releases_only))
        .with_version_pattern(crate::compile_version_pattern(
            self.version_pattern.as_deref(),
        )?)
        .with_fallback(self.fallback_version.clone());

        Ok(DependencyAddition {
            request,
            scope: self.scope,
            optional: self.optional,
        })
    }
}

/// Add a dependency to the POM at `pom_path`, resolving ranges against the
/// configured repositories.
pub fn add_dependency(
    pom_path: &Path,
    opts: &AddOptions,
    config: &GlobalConfig,
) -> PomsmithResult<AddOutcome> {
    let catalog = RemoteCatalog::from_config(config, opts.offline || config.resolve.offline)?;
    add_dependency_with_catalog(pom_path, opts, config, &catalog)
}

/// Like [`add_dependency`] with an explicit version catalog.
///
/// The file is rewritten only when a declaration was actually inserted.
pub fn add_dependency_with_catalog<C>(
    pom_path: &Path,
    opts: &AddOptions,
    config: &GlobalConfig,
    catalog: &C,
) -> PomsmithResult<AddOutcome>
where
    C: VersionCatalog + ?Sized,
{
    let addition = opts.to_addition(config)?;
    let mut editor = PomEditor::open(pom_path)?;
    let mut resolver = VersionResolver::new(catalog);

    let outcome = editor.add_dependency(&mut resolver, &addition)?;
    if let AddOutcome::Added { .. } = outcome {
        editor.save()?;
        tracing::info!("wrote {}", pom_path.display());
    }
    Ok(outcome)
}
