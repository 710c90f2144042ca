use std::fs;

use pomsmith_core::dependency::{Coordinate, DependencyScope};
use pomsmith_maven::editor::{AddOutcome, DependencyAddition, PomEditor};
use pomsmith_resolver::session::{FamilyPattern, VersionDecision, VersionRequest, VersionResolver};
use pomsmith_util::errors::PomsmithError;

const APP_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0.0</version>

    <properties>
        <jackson.version>2.15.2</jackson.version>
    </properties>

    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>com.google.guava</groupId>
                <artifactId>guava</artifactId>
                <version>32.1.3-jre</version>
            </dependency>
        </dependencies>
    </dependencyManagement>

    <dependencies>
        <!-- json -->
        <dependency>
            <groupId>com.fasterxml.jackson.core</groupId>
            <artifactId>jackson-core</artifactId>
            <version>${jackson.version}</version>
        </dependency>
        <dependency>
            <groupId>org.slf4j</groupId>
            <artifactId>slf4j-api</artifactId>
            <version>2.0.9</version>
        </dependency>
        <dependency>
            <groupId>org.junit.jupiter</groupId>
            <artifactId>junit-jupiter</artifactId>
            <version>5.10.1</version>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <finalName>app</finalName>
    </build>
</project>
"#;

fn no_catalog(_: &str, _: &str) -> Result<Vec<String>, PomsmithError> {
    panic!("catalog must not be consulted")
}

fn addition(group: &str, artifact: &str, version: &str) -> DependencyAddition {
    DependencyAddition {
        request: VersionRequest::new(Coordinate::new(group, artifact), version),
        scope: None,
        optional: false,
    }
}

#[test]
fn soft_version_lands_in_canonical_position() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let outcome = editor
        .add_dependency(&mut resolver, &addition("io.micrometer", "micrometer-core", "1.12.0"))
        .unwrap();

    assert!(matches!(
        outcome,
        AddOutcome::Added {
            created_container: false,
            decision: VersionDecision::Requested { .. },
            ..
        }
    ));
    let expected = APP_POM.replace(
        "        <dependency>\n            <groupId>org.slf4j</groupId>",
        "        <dependency>\n            <groupId>io.micrometer</groupId>\n            <artifactId>micrometer-core</artifactId>\n            <version>1.12.0</version>\n        </dependency>\n        <dependency>\n            <groupId>org.slf4j</groupId>",
    );
    assert_eq!(editor.to_xml(), expected);
}

#[test]
fn managed_dependency_is_written_without_version() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let outcome = editor
        .add_dependency(&mut resolver, &addition("com.google.guava", "guava", "[30,)"))
        .unwrap();

    let AddOutcome::Added {
        declaration,
        decision,
        ..
    } = outcome
    else {
        panic!("expected the dependency to be added");
    };
    assert_eq!(declaration.version, None);
    assert_eq!(
        decision,
        VersionDecision::Managed {
            version: "32.1.3-jre".to_string()
        }
    );
    assert!(editor.to_xml().contains(
        "        <dependency>\n            <groupId>com.google.guava</groupId>\n            <artifactId>guava</artifactId>\n        </dependency>\n        <dependency>\n            <groupId>org.slf4j</groupId>"
    ));
}

#[test]
fn family_member_reuses_property_reference() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let mut add = addition("com.fasterxml.jackson.core", "jackson-databind", "2.10.0");
    add.request = add
        .request
        .with_family(Some(FamilyPattern::new(r"com\.fasterxml\.jackson\..*").unwrap()));

    editor.add_dependency(&mut resolver, &add).unwrap();
    assert!(editor.to_xml().contains(
        "<artifactId>jackson-databind</artifactId>\n            <version>${jackson.version}</version>"
    ));
}

#[test]
fn range_resolves_through_catalog() {
    let catalog = |group: &str, artifact: &str| -> Result<Vec<String>, PomsmithError> {
        assert_eq!((group, artifact), ("org.apache.commons", "commons-lang3"));
        Ok(vec!["3.12.0".into(), "3.13.0".into(), "3.14.0".into(), "4.0.0-M1".into()])
    };
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&catalog);
    let mut add = addition("org.apache.commons", "commons-lang3", "[3.0,4.0)");
    add.request = add.request.releases_only(true);

    editor.add_dependency(&mut resolver, &add).unwrap();
    assert!(editor
        .to_xml()
        .contains("<artifactId>commons-lang3</artifactId>\n            <version>3.14.0</version>"));
}

#[test]
fn test_scope_sorts_after_compile_dependencies() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let mut add = addition("org.assertj", "assertj-core", "3.24.2");
    add.scope = Some(DependencyScope::Test);
    editor.add_dependency(&mut resolver, &add).unwrap();

    let xml = editor.to_xml();
    let assertj = xml.find("assertj-core").unwrap();
    let junit = xml.find("junit-jupiter").unwrap();
    let slf4j = xml.find("slf4j-api").unwrap();
    assert!(slf4j < assertj && assertj < junit);
    assert!(xml.contains("<version>3.24.2</version>\n            <scope>test</scope>"));
}

#[test]
fn second_add_is_a_no_op() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let add = addition("io.micrometer", "micrometer-core", "1.12.0");
    editor.add_dependency(&mut resolver, &add).unwrap();
    let once = editor.to_xml();

    let outcome = editor.add_dependency(&mut resolver, &add).unwrap();
    assert_eq!(
        outcome,
        AddOutcome::AlreadyDeclared {
            version: Some("1.12.0".to_string())
        }
    );
    assert_eq!(editor.to_xml(), once);
}

#[test]
fn missing_container_is_created_in_model_order() {
    let pom = "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <artifactId>lib</artifactId>\n  <properties>\n    <x>1</x>\n  </properties>\n  <build/>\n</project>\n";
    let mut editor = PomEditor::parse(pom).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let outcome = editor
        .add_dependency(&mut resolver, &addition("org.example", "util", "0.3"))
        .unwrap();
    assert!(matches!(
        outcome,
        AddOutcome::Added {
            created_container: true,
            ..
        }
    ));
    assert_eq!(
        editor.to_xml(),
        "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <artifactId>lib</artifactId>\n  <properties>\n    <x>1</x>\n  </properties>\n  <dependencies>\n    <dependency>\n      <groupId>org.example</groupId>\n      <artifactId>util</artifactId>\n      <version>0.3</version>\n    </dependency>\n  </dependencies>\n  <build/>\n</project>\n"
    );
}

#[test]
fn malformed_range_is_written_literally() {
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    editor
        .add_dependency(&mut resolver, &addition("org.example", "odd", "[1.0,2.0"))
        .unwrap();
    assert!(editor.to_xml().contains("<version>[1.0,2.0</version>"));
}

#[test]
fn unsatisfiable_range_leaves_document_untouched() {
    let catalog =
        |_: &str, _: &str| -> Result<Vec<String>, PomsmithError> { Ok(vec!["1.0".into()]) };
    let mut editor = PomEditor::parse(APP_POM).unwrap();
    let mut resolver = VersionResolver::new(&catalog);
    let err = editor
        .add_dependency(&mut resolver, &addition("org.example", "lib", "[2.0,3.0)"))
        .unwrap_err();
    assert!(matches!(err, PomsmithError::NoSatisfyingVersion { .. }));
    assert_eq!(editor.to_xml(), APP_POM);
}

#[test]
fn parent_management_applies_through_relative_path() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("pom.xml"),
        r#"<project>
  <groupId>org.example</groupId>
  <artifactId>parent</artifactId>
  <version>7</version>
  <properties><netty.version>4.1.100.Final</netty.version></properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>io.netty</groupId>
        <artifactId>netty-handler</artifactId>
        <version>${netty.version}</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>
"#,
    )
    .unwrap();
    let module = tmp.path().join("module");
    fs::create_dir(&module).unwrap();
    let pom_path = module.join("pom.xml");
    fs::write(
        &pom_path,
        r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>7</version>
  </parent>
  <artifactId>module</artifactId>
</project>
"#,
    )
    .unwrap();

    let mut editor = PomEditor::open(&pom_path).unwrap();
    let mut resolver = VersionResolver::new(&no_catalog);
    let outcome = editor
        .add_dependency(&mut resolver, &addition("io.netty", "netty-handler", "4.0.0"))
        .unwrap();
    assert!(matches!(
        outcome,
        AddOutcome::Added {
            decision: VersionDecision::Managed { .. },
            ..
        }
    ));
    editor.save().unwrap();

    let written = fs::read_to_string(&pom_path).unwrap();
    assert!(written.contains("<artifactId>netty-handler</artifactId>\n    </dependency>"));
    assert!(!written.contains("4.0.0"));
}

#[test]
fn mismatched_parent_on_disk_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("pom.xml"),
        "<project><groupId>other</groupId><artifactId>unrelated</artifactId><version>1</version>\
         <dependencyManagement><dependencies><dependency><groupId>g</groupId>\
         <artifactId>a</artifactId><version>9</version></dependency></dependencies>\
         </dependencyManagement></project>",
    )
    .unwrap();
    let module = tmp.path().join("module");
    fs::create_dir(&module).unwrap();
    let pom_path = module.join("pom.xml");
    fs::write(
        &pom_path,
        "<project><parent><groupId>org.example</groupId><artifactId>parent</artifactId>\
         <version>7</version></parent><artifactId>module</artifactId></project>",
    )
    .unwrap();

    let mut editor = PomEditor::open(&pom_path).unwrap();
    assert_eq!(editor.model().dependency_management.len(), 0);
}
