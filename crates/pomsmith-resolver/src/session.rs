//! Deciding which version a new dependency declaration carries.
//!
//! Strategies run in a fixed order and the first one that decides wins:
//!
//! 1. **Managed**: a managing declaration already pins the coordinate, so the
//!    new entry carries no version at all.
//! 2. **Family**: an existing dependency whose group matches the family
//!    pattern lends its version text, keeping co-versioned modules aligned.
//! 3. **Requested**: the intended expression is resolved through a one-entry
//!    [`RequirementChain`] against the catalog, once per coordinate per
//!    session.

use std::cmp::Ordering;

use regex::Regex;

use pomsmith_core::dependency::Coordinate;
use pomsmith_util::errors::PomsmithError;

use crate::cache::ResolvedVersions;
use crate::range::VersionRange;
use crate::requirement::{Requirement, RequirementChain};
use crate::source::{ManagedVersions, SiblingDependency, VersionCatalog};
use crate::version::{self, MavenVersion};

/// Selector for the newest release.
pub const LATEST_RELEASE: &str = "latest.release";
/// Selector for the newest version of any kind, snapshots included.
pub const LATEST_INTEGRATION: &str = "latest.integration";

/// What the resolver decided for a new declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDecision {
    /// A managing declaration already pins `version`; write none.
    Managed { version: String },
    /// Inherited from the newest member of the dependency family.
    Family { version: String },
    /// Resolved from the requested expression.
    Requested { version: String },
}

impl VersionDecision {
    /// The version to write into the declaration, if any.
    pub fn explicit_version(&self) -> Option<&str> {
        match self {
            Self::Managed { .. } => None,
            Self::Family { version } | Self::Requested { version } => Some(version),
        }
    }
}

/// The resolution strategies, in the order they are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Managed,
    Family,
    Requested,
}

pub const PIPELINE: [Strategy; 3] = [Strategy::Managed, Strategy::Family, Strategy::Requested];

/// A regular expression over group ids identifying a co-versioned
/// dependency family, e.g. `com\.fasterxml\.jackson\..*`. It must match the
/// whole group id.
#[derive(Debug, Clone)]
pub struct FamilyPattern {
    pattern: String,
    regex: Regex,
}

impl FamilyPattern {
    pub fn new(pattern: &str) -> Result<Self, PomsmithError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            PomsmithError::Resolution {
                message: format!("invalid family pattern '{pattern}': {e}"),
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, group_id: &str) -> bool {
        self.regex.is_match(group_id)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// A request to pick a version for one coordinate.
#[derive(Debug, Clone)]
pub struct VersionRequest {
    pub coordinate: Coordinate,
    /// Exact version, range, or `latest.*` selector.
    pub version: String,
    pub family: Option<FamilyPattern>,
    /// Drop snapshots and other pre-releases from the catalog.
    pub releases_only: bool,
    /// Catalog entries must match this to be considered.
    pub version_pattern: Option<Regex>,
    /// Written verbatim when a range matches nothing in the catalog.
    pub fallback: Option<String>,
}

impl VersionRequest {
    pub fn new(coordinate: Coordinate, version: impl Into<String>) -> Self {
        Self {
            coordinate,
            version: version.into(),
            family: None,
            releases_only: false,
            version_pattern: None,
            fallback: None,
        }
    }

    pub fn with_family(mut self, family: Option<FamilyPattern>) -> Self {
        self.family = family;
        self
    }

    pub fn releases_only(mut self, releases_only: bool) -> Self {
        self.releases_only = releases_only;
        self
    }

    pub fn with_version_pattern(mut self, pattern: Option<Regex>) -> Self {
        self.version_pattern = pattern;
        self
    }

    pub fn with_fallback(mut self, fallback: Option<String>) -> Self {
        self.fallback = fallback;
        self
    }

    /// The requirement the expression stands for, plus whether the catalog
    /// must be restricted to releases.
    ///
    /// A malformed range is kept as a literal soft pin: free-text versions
    /// are legitimate in a manifest.
    fn requirement(&self) -> (Requirement, bool) {
        let expression = self.version.trim();
        if expression.eq_ignore_ascii_case(LATEST_RELEASE) {
            return (Requirement::hard(VersionRange::unbounded()), true);
        }
        if expression.eq_ignore_ascii_case(LATEST_INTEGRATION) {
            return (Requirement::hard(VersionRange::unbounded()), false);
        }
        let requirement = match Requirement::parse(expression) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("{}: {e}; using it as a literal version", self.coordinate);
                Requirement::soft(expression)
            }
        };
        (requirement, self.releases_only)
    }
}

/// What the resolver may consult about the document being edited.
#[derive(Default)]
pub struct ResolutionContext<'a> {
    pub managed: Option<&'a dyn ManagedVersions>,
    pub siblings: &'a [SiblingDependency],
}

/// One resolution session. Holds the catalog and a per-coordinate memo so
/// each coordinate's catalog is fetched at most once.
pub struct VersionResolver<'c, C: VersionCatalog + ?Sized> {
    catalog: &'c C,
    resolved: ResolvedVersions,
    fetches: usize,
}

impl<'c, C: VersionCatalog + ?Sized> VersionResolver<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            resolved: ResolvedVersions::new(),
            fetches: 0,
        }
    }

    /// Number of catalog fetches performed so far.
    pub fn catalog_fetches(&self) -> usize {
        self.fetches
    }

    /// Run the strategy pipeline for `request`.
    pub fn resolve(
        &mut self,
        request: &VersionRequest,
        ctx: &ResolutionContext<'_>,
    ) -> Result<VersionDecision, PomsmithError> {
        for strategy in PIPELINE {
            let decision = match strategy {
                Strategy::Managed => managed(request, ctx),
                Strategy::Family => family(request, ctx),
                Strategy::Requested => Some(self.requested(request)?),
            };
            if let Some(decision) = decision {
                tracing::debug!("{}: {strategy:?} decided {decision:?}", request.coordinate);
                return Ok(decision);
            }
        }
        Err(PomsmithError::Resolution {
            message: format!("no strategy produced a version for {}", request.coordinate),
        })
    }

    fn requested(&mut self, request: &VersionRequest) -> Result<VersionDecision, PomsmithError> {
        let group = &request.coordinate.group_id;
        let artifact = &request.coordinate.artifact_id;

        if let Some(version) = self.resolved.get(group, artifact) {
            tracing::debug!("{}: session cache hit ({version})", request.coordinate);
            return Ok(VersionDecision::Requested {
                version: version.to_string(),
            });
        }

        let (requirement, releases_only) = request.requirement();
        let chain = RequirementChain::from_requirement(
            requirement.with_fallback(request.fallback.clone()),
            0,
        )
        .for_target(request.coordinate.to_string());

        let catalog = self.catalog;
        let fetches = &mut self.fetches;
        let version = chain.resolve(|| {
            *fetches += 1;
            let versions = catalog.versions(group, artifact)?;
            tracing::debug!(
                "{}: catalog lists {} versions",
                request.coordinate,
                versions.len()
            );
            Ok(versions
                .into_iter()
                .filter(|v| !releases_only || MavenVersion::parse(v).is_release())
                .filter(|v| request.version_pattern.as_ref().map_or(true, |p| p.is_match(v)))
                .collect())
        })?;

        Ok(VersionDecision::Requested {
            version: self.resolved.insert(group, artifact, &version).to_string(),
        })
    }
}

fn managed(request: &VersionRequest, ctx: &ResolutionContext<'_>) -> Option<VersionDecision> {
    let version = ctx.managed?.managed_version(&request.coordinate)?;
    Some(VersionDecision::Managed { version })
}

/// The requested text of the family member with the highest version. The
/// interpolated version orders the members; the raw text is what gets
/// copied, so a shared `${property}` stays shared. On a tie the member
/// declared first wins.
fn family(request: &VersionRequest, ctx: &ResolutionContext<'_>) -> Option<VersionDecision> {
    let pattern = request.family.as_ref()?;
    let newest = ctx
        .siblings
        .iter()
        .filter(|s| pattern.matches(&s.group_id))
        .filter_map(|s| {
            let requested = s.requested.as_deref()?;
            Some((s.resolved.as_deref().unwrap_or(requested), requested))
        })
        .reduce(|best, member| {
            if version::compare(member.0, best.0) == Ordering::Greater {
                member
            } else {
                best
            }
        })?;
    tracing::debug!(
        "{}: family '{}' newest member at {}",
        request.coordinate,
        pattern.as_str(),
        newest.0
    );
    Some(VersionDecision::Family {
        version: newest.1.to_string(),
    })
}
