//! Operation: resolve a version expression for one coordinate without
//! touching any POM.

use serde::Serialize;

use pomsmith_core::config::GlobalConfig;
use pomsmith_core::dependency::Coordinate;
use pomsmith_maven::catalog::RemoteCatalog;
use pomsmith_resolver::session::{ResolutionContext, VersionRequest, VersionResolver};
use pomsmith_resolver::source::VersionCatalog;
use pomsmith_util::errors::{PomsmithError, PomsmithResult};

/// Options for `pomsmith resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// `group:artifact`.
    pub coordinate: String,
    /// Exact version, range, or `latest.*` selector.
    pub expression: String,
    pub releases_only: Option<bool>,
    pub version_pattern: Option<String>,
    pub fallback_version: Option<String>,
    pub offline: bool,
}

/// A resolved version, as printed by `pomsmith resolve --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    pub group_id: String,
    pub artifact_id: String,
    pub expression: String,
    pub version: String,
}

impl Resolved {
    pub fn to_json(&self) -> PomsmithResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PomsmithError::Generic {
                message: format!("Failed to serialize resolution: {e}"),
            }
            .into()
        })
    }
}

/// Resolve against the configured repositories.
pub fn resolve(opts: &ResolveOptions, config: &GlobalConfig) -> PomsmithResult<Resolved> {
    let catalog = RemoteCatalog::from_config(config, opts.offline || config.resolve.offline)?;
    resolve_with_catalog(opts, config, &catalog)
}

pub fn resolve_with_catalog<C>(
    opts: &ResolveOptions,
    config: &GlobalConfig,
    catalog: &C,
) -> PomsmithResult<Resolved>
where
    C: VersionCatalog + ?Sized,
{
    let spec = crate::parse_spec(&opts.coordinate)?;
    if spec.version.is_some() {
        return Err(PomsmithError::Generic {
            message: format!(
                "Expected group:artifact, got '{}'; pass the version expression separately",
                opts.coordinate
            ),
        }
        .into());
    }

    let request = VersionRequest::new(
        Coordinate::new(&spec.group_id, &spec.artifact_id),
        &opts.expression,
    )
    .releases_only(opts.releases_only.unwrap_or(config.resolve.releases_only))
    .with_version_pattern(crate::compile_version_pattern(
        opts.version_pattern.as_deref(),
    )?)
    .with_fallback(opts.fallback_version.clone());

    let mut resolver = VersionResolver::new(catalog);
    let decision = resolver.resolve(&request, &ResolutionContext::default())?;
    let version = decision.explicit_version().unwrap_or_default().to_string();

    Ok(Resolved {
        group_id: spec.group_id,
        artifact_id: spec.artifact_id,
        expression: opts.expression.clone(),
        version,
    })
}
