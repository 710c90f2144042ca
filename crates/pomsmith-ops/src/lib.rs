pub mod ops_add;
pub mod ops_resolve;

use regex::Regex;

use pomsmith_core::dependency::DependencySpec;
use pomsmith_util::errors::{PomsmithError, PomsmithResult};

/// Parse a `group:artifact[:version]` argument.
pub fn parse_spec(spec: &str) -> PomsmithResult<DependencySpec> {
    DependencySpec::parse(spec).ok_or_else(|| {
        PomsmithError::Generic {
            message: format!(
                "Invalid dependency format: '{spec}'. Expected group:artifact[:version]"
            ),
        }
        .into()
    })
}

/// Compile the optional `--version-pattern` filter.
pub fn compile_version_pattern(pattern: Option<&str>) -> PomsmithResult<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| PomsmithError::Generic {
                message: format!("Invalid version pattern '{p}': {e}"),
            })
        })
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_requires_group_and_artifact() {
        assert!(parse_spec("org.example").is_err());
        assert!(parse_spec("org.example:").is_err());
        let spec = parse_spec("org.example:lib:[1,2)").unwrap();
        assert_eq!(spec.version.as_deref(), Some("[1,2)"));
    }

    #[test]
    fn version_pattern_is_optional() {
        assert!(compile_version_pattern(None).unwrap().is_none());
        assert!(compile_version_pattern(Some("-jre$")).unwrap().is_some());
        assert!(compile_version_pattern(Some("(")).is_err());
    }
}
