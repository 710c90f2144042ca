//! Depth-annotated version requirement chains.
//!
//! A chain collects every version constraint seen for one artifact while a
//! dependency graph is walked. Each constraint records how far it is from the
//! original request (depth 0 is the explicit request). Resolution is a pure
//! fold over the chain:
//!
//! - if any hard range is present, the nearest one wins and is matched
//!   against the catalog; farther ranges, even conflicting ones, are ignored
//! - otherwise the nearest soft version is returned as-is, and the catalog
//!   is never fetched
//!
//! Ties on depth go to the constraint appended first.

use std::fmt;

use pomsmith_util::errors::PomsmithError;

use crate::range::{self, VersionRange};

/// A version requirement before it is attached to a chain.
#[derive(Debug, Clone)]
pub enum Requirement {
    /// A preferred literal version; advisory only.
    Soft(String),
    /// An interval that must be satisfied.
    Hard {
        range: VersionRange,
        /// Literal supplied alongside the range at the call site, used
        /// verbatim when no catalog entry falls inside the range.
        fallback: Option<String>,
    },
}

impl Requirement {
    /// Classify an expression: bracket characters make it a hard range
    /// (which must then parse), anything else is a soft literal.
    pub fn parse(expression: &str) -> Result<Self, PomsmithError> {
        if range::is_range_syntax(expression) {
            Ok(Self::hard(VersionRange::parse(expression)?))
        } else {
            Ok(Self::Soft(expression.trim().to_string()))
        }
    }

    pub fn soft(version: impl Into<String>) -> Self {
        Self::Soft(version.into())
    }

    pub fn hard(range: VersionRange) -> Self {
        Self::Hard {
            range,
            fallback: None,
        }
    }

    /// Attach a fallback literal to a hard requirement. Soft requirements are
    /// returned unchanged.
    pub fn with_fallback(self, literal: Option<String>) -> Self {
        match self {
            Self::Hard { range, .. } => Self::Hard {
                range,
                fallback: literal,
            },
            soft => soft,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Hard { .. })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft(v) => f.write_str(v),
            Self::Hard { range, .. } => write!(f, "{range}"),
        }
    }
}

/// A requirement together with its distance from the original request.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub requirement: Requirement,
    pub depth: u32,
}

impl Constraint {
    pub fn new(requirement: Requirement, depth: u32) -> Self {
        Self { requirement, depth }
    }
}

/// An append-only sequence of constraints on one artifact.
#[derive(Debug, Clone, Default)]
pub struct RequirementChain {
    target: Option<String>,
    constraints: Vec<Constraint>,
}

impl RequirementChain {
    /// Seed a chain with its first constraint.
    pub fn from_requirement(requirement: Requirement, depth: u32) -> Self {
        Self {
            target: None,
            constraints: vec![Constraint::new(requirement, depth)],
        }
    }

    /// Build a chain from constraints whose depths were decided elsewhere.
    /// An empty vector is accepted here and rejected at resolution time.
    pub fn from_constraints(constraints: Vec<Constraint>) -> Self {
        Self {
            target: None,
            constraints,
        }
    }

    /// Name the artifact this chain constrains, for error reporting.
    pub fn for_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Append a requirement one level deeper than the last constraint.
    pub fn add(mut self, requirement: Requirement) -> Self {
        let depth = self.constraints.last().map_or(0, |c| c.depth + 1);
        self.constraints.push(Constraint::new(requirement, depth));
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Pick one concrete version.
    ///
    /// `catalog` lists the published versions; it is called at most once,
    /// and only when a hard range has to be matched.
    pub fn resolve<F>(&self, catalog: F) -> Result<String, PomsmithError>
    where
        F: FnOnce() -> Result<Vec<String>, PomsmithError>,
    {
        let chosen = match self.constraints.as_slice() {
            [] => return Err(PomsmithError::InvalidChain),
            [only] => only,
            all => nearest(all.iter().filter(|c| c.requirement.is_hard()))
                .or_else(|| nearest(all.iter()))
                .ok_or(PomsmithError::InvalidChain)?,
        };
        tracing::debug!(
            "{}: resolving with '{}' at depth {}",
            self.target_name(),
            chosen.requirement,
            chosen.depth
        );

        match &chosen.requirement {
            Requirement::Soft(version) => Ok(version.clone()),
            Requirement::Hard { range, fallback } => {
                let versions = catalog()?;
                if let Some(version) = range.select_max(&versions) {
                    return Ok(version);
                }
                match fallback {
                    Some(literal) => {
                        tracing::warn!(
                            "{}: no published version in {range}, falling back to {literal}",
                            self.target_name()
                        );
                        Ok(literal.clone())
                    }
                    None => Err(PomsmithError::NoSatisfyingVersion {
                        coordinate: self.target_name().to_string(),
                        range: range.to_string(),
                    }),
                }
            }
        }
    }

    fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or("<unnamed artifact>")
    }
}

/// Minimum-depth constraint, earliest on ties.
fn nearest<'a>(constraints: impl Iterator<Item = &'a Constraint>) -> Option<&'a Constraint> {
    constraints.reduce(|best, c| if c.depth < best.depth { c } else { best })
}
