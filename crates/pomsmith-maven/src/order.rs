//! Canonical element order inside a POM.

use std::cmp::Ordering;

use pomsmith_core::dependency::DependencyScope;

use crate::xml::Element;

/// Children of `<project>` in the order of the Maven 4.0.0 model.
pub const PROJECT_ELEMENT_ORDER: &[&str] = &[
    "modelVersion",
    "parent",
    "groupId",
    "artifactId",
    "version",
    "packaging",
    "name",
    "description",
    "url",
    "inceptionYear",
    "organization",
    "licenses",
    "developers",
    "contributors",
    "mailingLists",
    "prerequisites",
    "modules",
    "scm",
    "issueManagement",
    "ciManagement",
    "distributionManagement",
    "properties",
    "dependencyManagement",
    "dependencies",
    "repositories",
    "pluginRepositories",
    "build",
    "reporting",
    "profiles",
];

/// Rank of a `<project>` child; unknown elements rank after all known ones.
fn project_rank(name: &str) -> usize {
    PROJECT_ELEMENT_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(PROJECT_ELEMENT_ORDER.len())
}

/// Order of `<project>` children.
pub fn project_element_order(a: &Element, b: &Element) -> Ordering {
    project_rank(a.name()).cmp(&project_rank(b.name()))
}

fn dependency_key(e: &Element) -> (DependencyScope, String, String) {
    (
        DependencyScope::from_name(e.child_text("scope").as_deref()),
        e.child_text("groupId").unwrap_or_default(),
        e.child_text("artifactId").unwrap_or_default(),
    )
}

/// Order of `<dependency>` elements: scope, then groupId, then artifactId.
pub fn dependency_order(a: &Element, b: &Element) -> Ordering {
    dependency_key(a).cmp(&dependency_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(group: &str, artifact: &str, scope: Option<&str>) -> Element {
        let e = Element::new("dependency")
            .with_child(Element::leaf("groupId", group))
            .with_child(Element::leaf("artifactId", artifact));
        match scope {
            Some(s) => e.with_child(Element::leaf("scope", s)),
            None => e,
        }
    }

    #[test]
    fn project_children_follow_model_order() {
        let deps = Element::new("dependencies");
        let props = Element::new("properties");
        let build = Element::new("build");
        assert_eq!(project_element_order(&props, &deps), Ordering::Less);
        assert_eq!(project_element_order(&build, &deps), Ordering::Greater);
        assert_eq!(
            project_element_order(&Element::new("x-custom"), &Element::new("profiles")),
            Ordering::Greater
        );
    }

    #[test]
    fn dependencies_sort_by_scope_group_artifact() {
        let a = dep("org.b", "x", None);
        let b = dep("org.a", "y", Some("test"));
        let c = dep("org.a", "z", None);
        assert_eq!(dependency_order(&a, &b), Ordering::Less);
        assert_eq!(dependency_order(&c, &a), Ordering::Less);
        assert_eq!(
            dependency_order(&dep("g", "a", Some("compile")), &dep("g", "a", None)),
            Ordering::Equal
        );
    }
}
