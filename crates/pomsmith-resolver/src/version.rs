//! Maven version parsing and comparison.
//!
//! Any string is a version. Ordering is segment-wise:
//! - Segments are split on `.`, `-`, `_`, `+` and on every digit/letter boundary
//! - Numeric segments compare as numbers, of any length
//! - Text segments compare lexicographically, ignoring case
//! - A numeric segment sorts above a text segment
//! - Zero numeric segments before a qualifier or at the end are dropped, so
//!   `1` == `1.0.0` and `1.0-jre` == `1-jre`
//! - A missing segment is zero against a number and the empty qualifier
//!   against text; pre-release markers sort below the empty qualifier,
//!   `final`, `ga` and `release` equal it, and any other qualifier sorts above
//!
//! So `1.0-SNAPSHOT` < `1.0` == `1.0.Final` < `1.0-jre` < `1.0.1`.

use std::cmp::Ordering;
use std::fmt;

/// Qualifiers that mark a pre-release build.
const PRE_RELEASE_MARKERS: &[&str] = &[
    "snapshot",
    "alpha",
    "a",
    "beta",
    "b",
    "milestone",
    "m",
    "rc",
    "cr",
    "preview",
    "dev",
    "ea",
    "incubating",
];

/// Qualifiers that name a release build, equal to no qualifier at all.
const RELEASE_QUALIFIERS: &[&str] = &["final", "ga", "release"];

/// A parsed Maven version with comparable segments.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    /// Decimal digits with leading zeros stripped (empty for zero).
    Numeric(String),
    /// Lowercased text.
    Text(String),
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            segments: parse_segments(version),
        }
    }

    /// `false` when any qualifier marks a snapshot, alpha, beta, milestone or
    /// release-candidate build.
    pub fn is_release(&self) -> bool {
        !self.segments.iter().any(|s| match s {
            Segment::Text(t) => PRE_RELEASE_MARKERS.contains(&t.as_str()),
            Segment::Numeric(_) => false,
        })
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings without keeping the parsed form around.
pub fn compare(a: &str, b: &str) -> Ordering {
    MavenVersion::parse(a).cmp(&MavenVersion::parse(b))
}

/// Where a qualifier sorts relative to a bare release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum QualifierRank {
    PreRelease,
    Release,
    Other,
}

fn qualifier_rank(text: &str) -> QualifierRank {
    if PRE_RELEASE_MARKERS.contains(&text) {
        QualifierRank::PreRelease
    } else if RELEASE_QUALIFIERS.contains(&text) {
        QualifierRank::Release
    } else {
        QualifierRank::Other
    }
}

/// `None` is padding past the end of the shorter version.
fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(Segment::Numeric(a)), Some(Segment::Numeric(b))) => {
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (Some(Segment::Text(a)), Some(Segment::Text(b))) => {
            match (qualifier_rank(a), qualifier_rank(b)) {
                (QualifierRank::Release, QualifierRank::Release) => Ordering::Equal,
                (ra, rb) => ra.cmp(&rb).then_with(|| a.cmp(b)),
            }
        }
        (Some(Segment::Numeric(_)), Some(Segment::Text(_))) => Ordering::Greater,
        (Some(Segment::Text(_)), Some(Segment::Numeric(_))) => Ordering::Less,
        (Some(Segment::Numeric(n)), None) => {
            if n.is_empty() {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (Some(Segment::Text(t)), None) => qualifier_rank(t).cmp(&QualifierRank::Release),
        (None, Some(_)) => compare_segments(b, a).reverse(),
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in version.trim().chars() {
        if matches!(ch, '.' | '-' | '_' | '+') {
            flush(&mut current, &mut segments);
            continue;
        }
        let boundary = current
            .chars()
            .last()
            .is_some_and(|prev| prev.is_ascii_digit() != ch.is_ascii_digit());
        if boundary {
            flush(&mut current, &mut segments);
        }
        current.push(ch);
    }
    flush(&mut current, &mut segments);
    drop_trailing_zeros(&mut segments);

    segments
}

fn drop_trailing_zeros(segments: &mut Vec<Segment>) {
    while matches!(segments.last(), Some(Segment::Numeric(n)) if n.is_empty()) {
        segments.pop();
    }
}

fn flush(current: &mut String, segments: &mut Vec<Segment>) {
    if current.is_empty() {
        return;
    }
    let segment = classify(current);
    if let Segment::Text(_) = segment {
        drop_trailing_zeros(segments);
    }
    segments.push(segment);
    current.clear();
}

fn classify(token: &str) -> Segment {
    if token.chars().all(|c| c.is_ascii_digit()) {
        Segment::Numeric(token.trim_start_matches('0').to_string())
    } else {
        Segment::Text(token.to_lowercase())
    }
}
