//! Maven version range expressions.
//!
//! Supports `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[,)` and `[1.0]` (exact).
//! A string without any bracket characters is a plain version, not a range.

use std::cmp::Ordering;
use std::fmt;

use pomsmith_util::errors::PomsmithError;

use crate::version::MavenVersion;

/// A single-interval version range.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
    expression: String,
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

/// Whether `expression` uses range syntax. Any bracket character counts, so
/// half-written ranges are reported as malformed rather than taken literally.
pub fn is_range_syntax(expression: &str) -> bool {
    expression.contains(&['[', ']', '(', ')'][..])
}

impl VersionRange {
    /// A range that admits every version.
    pub fn unbounded() -> Self {
        Self {
            lower: None,
            upper: None,
            expression: "[,)".to_string(),
        }
    }

    /// Parse a range expression, failing with `MalformedRange` on anything
    /// that is not a single well-formed interval.
    pub fn parse(spec: &str) -> Result<Self, PomsmithError> {
        let s = spec.trim();
        let malformed = |reason: &str| PomsmithError::MalformedRange {
            expression: spec.to_string(),
            reason: reason.to_string(),
        };

        let open_inclusive = match s.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(malformed("expected '[' or '(' at the start")),
        };
        let close_inclusive = match s.chars().last() {
            Some(']') if s.len() > 1 => true,
            Some(')') if s.len() > 1 => false,
            _ => return Err(malformed("expected ']' or ')' at the end")),
        };

        let inner = &s[1..s.len() - 1];
        if is_range_syntax(inner) {
            return Err(malformed("only a single interval is supported"));
        }

        let Some((lower, upper)) = inner.split_once(',') else {
            // Exact version: [1.0] means exactly 1.0
            let exact = inner.trim();
            if exact.is_empty() {
                return Err(malformed("empty range"));
            }
            if !open_inclusive || !close_inclusive {
                return Err(malformed("an exact version must be written as [version]"));
            }
            let bound = Bound {
                version: MavenVersion::parse(exact),
                inclusive: true,
            };
            return Ok(Self {
                lower: Some(bound.clone()),
                upper: Some(bound),
                expression: s.to_string(),
            });
        };

        if upper.contains(',') {
            return Err(malformed("too many commas"));
        }

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: MavenVersion::parse(text),
                inclusive,
            })
        };
        let lower = bound(lower, open_inclusive);
        let upper = bound(upper, close_inclusive);

        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            match lo.version.cmp(&hi.version) {
                Ordering::Greater => return Err(malformed("lower bound is above upper bound")),
                Ordering::Equal if !(lo.inclusive && hi.inclusive) => {
                    return Err(malformed("range excludes its only version"));
                }
                _ => {}
            }
        }

        Ok(Self {
            lower,
            upper,
            expression: s.to_string(),
        })
    }

    /// Check if a version satisfies this range.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(ref lower) = self.lower {
            let cmp = version.cmp(&lower.version);
            if lower.inclusive {
                if cmp == Ordering::Less {
                    return false;
                }
            } else if cmp != Ordering::Greater {
                return false;
            }
        }
        if let Some(ref upper) = self.upper {
            let cmp = version.cmp(&upper.version);
            if upper.inclusive {
                if cmp == Ordering::Greater {
                    return false;
                }
            } else if cmp != Ordering::Less {
                return false;
            }
        }
        true
    }

    /// The greatest catalog entry inside the range, if any.
    pub fn select_max<I, S>(&self, catalog: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        catalog
            .into_iter()
            .map(|v| MavenVersion::parse(v.as_ref()))
            .filter(|v| self.contains(v))
            .max()
            .map(|v| v.original)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}
