use pomsmith_core::dependency::{Coordinate, DependencyScope, DependencySpec};

#[test]
fn dependency_spec_parse_with_version() {
    let spec = DependencySpec::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(spec.group_id, "com.example");
    assert_eq!(spec.artifact_id, "my-lib");
    assert_eq!(spec.version.as_deref(), Some("1.0.0"));
}

#[test]
fn dependency_spec_parse_without_version() {
    let spec = DependencySpec::parse("com.example:my-lib").unwrap();
    assert_eq!(spec.version, None);
}

#[test]
fn dependency_spec_keeps_range_intact() {
    let spec = DependencySpec::parse("com.example:my-lib:[1.0,2.0)").unwrap();
    assert_eq!(spec.version.as_deref(), Some("[1.0,2.0)"));
}

#[test]
fn dependency_spec_parse_rejects_missing_parts() {
    assert!(DependencySpec::parse("").is_none());
    assert!(DependencySpec::parse("group").is_none());
    assert!(DependencySpec::parse("group:").is_none());
    assert!(DependencySpec::parse(":artifact").is_none());
    assert!(DependencySpec::parse("group:artifact:").is_none());
}

#[test]
fn dependency_spec_display_roundtrip() {
    let s = "com.example:my-lib:1.0.0";
    assert_eq!(DependencySpec::parse(s).unwrap().to_string(), s);
}

#[test]
fn dependency_scope_default_is_compile() {
    assert_eq!(DependencyScope::default(), DependencyScope::Compile);
}

#[test]
fn dependency_scope_from_str() {
    assert_eq!("provided".parse::<DependencyScope>(), Ok(DependencyScope::Provided));
    assert!("bundled".parse::<DependencyScope>().is_err());
}

#[test]
fn coordinate_effective_type_defaults_to_jar() {
    let c = Coordinate::new("g", "a");
    assert_eq!(c.effective_type(), "jar");
    assert_eq!(c.to_string(), "g:a");
    let pom = Coordinate::new("g", "a").with_type(Some("pom".into()));
    assert_eq!(pom.effective_type(), "pom");
    assert_eq!(pom.to_string(), "g:a:pom");
}
