//! The POM model: coordinates, parent reference, properties and dependency
//! lists, derived from a parsed `pom.xml` tree.
//!
//! Values are kept exactly as written; `${...}` references are resolved on
//! demand through [`Pom::interpolate`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pomsmith_core::dependency::{Coordinate, DEFAULT_TYPE};
use pomsmith_resolver::source::{ManagedVersions, SiblingDependency};
use pomsmith_util::errors::PomsmithError;

use crate::xml::{Element, XmlDocument};

const MAX_INTERPOLATION_PASSES: usize = 10;
const MAX_PARENT_DEPTH: usize = 16;
const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

/// A parsed POM (Project Object Model).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: Option<String>,
}

impl ParentRef {
    /// Whether `pom` is the project this reference names.
    pub fn matches(&self, pom: &Pom) -> bool {
        let version = pom.effective_version().map(|v| pom.interpolate(v));
        pom.artifact_id.as_deref() == Some(self.artifact_id.as_str())
            && pom.effective_group_id() == Some(self.group_id.as_str())
            && (self.version.is_empty() || version.as_deref() == Some(self.version.as_str()))
    }
}

/// A `<dependency>` entry, uninterpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub type_: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
}

impl PomDependency {
    fn from_element(e: &Element) -> Self {
        Self {
            group_id: e.child_text("groupId").unwrap_or_default(),
            artifact_id: e.child_text("artifactId").unwrap_or_default(),
            version: e.child_text("version"),
            type_: e.child_text("type"),
            classifier: e.child_text("classifier"),
            scope: e.child_text("scope"),
            optional: e.child_text("optional").is_some_and(|o| o == "true"),
        }
    }

    /// Whether this entry names `coordinate` once interpolated by `pom`.
    /// A missing type means `jar`; a missing classifier only matches a
    /// missing classifier.
    fn is(&self, coordinate: &Coordinate, pom: &Pom) -> bool {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| pom.interpolate(v))
                .filter(|v| !v.is_empty())
        };
        pom.interpolate(&self.group_id) == coordinate.group_id
            && pom.interpolate(&self.artifact_id) == coordinate.artifact_id
            && text(&self.type_).as_deref().unwrap_or(DEFAULT_TYPE) == coordinate.effective_type()
            && text(&self.classifier) == coordinate.classifier
    }
}

impl Pom {
    /// Build the model from a `<project>` element.
    pub fn from_element(project: &Element) -> Self {
        let parent = project.child("parent").map(|p| ParentRef {
            group_id: p.child_text("groupId").unwrap_or_default(),
            artifact_id: p.child_text("artifactId").unwrap_or_default(),
            version: p.child_text("version").unwrap_or_default(),
            relative_path: p.child_text("relativePath"),
        });

        let properties = project
            .child("properties")
            .map(|props| {
                props
                    .elements()
                    .map(|p| (p.name().to_string(), p.text()))
                    .collect()
            })
            .unwrap_or_default();

        let dependencies_of = |container: Option<&Element>| -> Vec<PomDependency> {
            container
                .map(|deps| {
                    deps.children_named("dependency")
                        .map(PomDependency::from_element)
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            group_id: project.child_text("groupId"),
            artifact_id: project.child_text("artifactId"),
            version: project.child_text("version"),
            packaging: project.child_text("packaging"),
            parent,
            properties,
            dependencies: dependencies_of(project.child("dependencies")),
            dependency_management: dependencies_of(
                project
                    .child("dependencyManagement")
                    .and_then(|dm| dm.child("dependencies")),
            ),
        }
    }

    pub fn from_document(doc: &XmlDocument) -> Self {
        Self::from_element(doc.root())
    }

    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references using POM properties and built-in
    /// project variables. Unknown references are left in place.
    pub fn interpolate(&self, input: &str) -> String {
        let mut current = input.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            if !current.contains("${") {
                break;
            }
            let next = self.interpolate_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn interpolate_once(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            match self.resolve_property(&rest[start + 2..start + len]) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..=start + len]),
            }
            rest = &rest[start + len + 1..];
        }
        out.push_str(rest);
        out
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        let parent = self.parent.as_ref();
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(str::to_string),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(str::to_string),
            "project.packaging" | "pom.packaging" => self.packaging.clone(),
            "project.parent.groupId" => parent.map(|p| p.group_id.clone()),
            "project.parent.artifactId" => parent.map(|p| p.artifact_id.clone()),
            "project.parent.version" => parent.map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Merge an ancestor's properties and dependency management into this
    /// model. Entries already present here win.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(str::to_string);
        }
        for dm in &parent.dependency_management {
            let overridden = self.dependency_management.iter().any(|d| {
                d.group_id == dm.group_id
                    && d.artifact_id == dm.artifact_id
                    && d.type_ == dm.type_
                    && d.classifier == dm.classifier
            });
            if !overridden {
                self.dependency_management.push(dm.clone());
            }
        }
    }

    /// The `<dependencies>` entry for `coordinate`, if declared.
    pub fn declared(&self, coordinate: &Coordinate) -> Option<&PomDependency> {
        self.dependencies.iter().find(|d| d.is(coordinate, self))
    }

    /// Declared dependencies with their raw and interpolated versions.
    pub fn siblings(&self) -> Vec<SiblingDependency> {
        self.dependencies
            .iter()
            .map(|d| SiblingDependency {
                group_id: self.interpolate(&d.group_id),
                artifact_id: self.interpolate(&d.artifact_id),
                requested: d.version.clone(),
                resolved: d.version.as_deref().map(|v| self.interpolate(v)),
            })
            .collect()
    }

    /// Where the parent POM lives relative to `pom_path`, following
    /// `<relativePath>` (default `../pom.xml`). An empty relative path
    /// disables the lookup.
    pub fn parent_path(&self, pom_path: &Path) -> Option<PathBuf> {
        let parent = self.parent.as_ref()?;
        let relative = parent
            .relative_path
            .as_deref()
            .unwrap_or(DEFAULT_RELATIVE_PATH);
        if relative.is_empty() {
            return None;
        }
        let path = pom_path.parent().unwrap_or(Path::new(".")).join(relative);
        if path.is_dir() {
            Some(path.join("pom.xml"))
        } else {
            Some(path)
        }
    }

    /// The merged model of every ancestor found on disk, the nearest taking
    /// precedence. The walk stops at the first ancestor that is missing or
    /// whose coordinates differ from the `<parent>` reference.
    pub fn load_ancestors(&self, pom_path: &Path) -> Result<Option<Pom>, PomsmithError> {
        let mut ancestors: Vec<Pom> = Vec::new();
        let mut path = pom_path.to_path_buf();

        while ancestors.len() < MAX_PARENT_DEPTH {
            let child = ancestors.last().unwrap_or(self);
            let Some(reference) = &child.parent else {
                break;
            };
            let Some(parent_path) = child.parent_path(&path) else {
                break;
            };
            if !parent_path.is_file() {
                tracing::debug!("parent POM {} not found", parent_path.display());
                break;
            }
            let parent = read_pom(&parent_path)?;
            if !reference.matches(&parent) {
                tracing::debug!(
                    "{} is not {}:{}, ignoring it",
                    parent_path.display(),
                    reference.group_id,
                    reference.artifact_id
                );
                break;
            }
            tracing::debug!("inheriting from {}", parent_path.display());
            ancestors.push(parent);
            path = parent_path;
        }

        Ok(ancestors.into_iter().rev().reduce(|farther, mut nearer| {
            nearer.apply_parent(&farther);
            nearer
        }))
    }
}

impl ManagedVersions for Pom {
    fn managed_version(&self, coordinate: &Coordinate) -> Option<String> {
        self.dependency_management
            .iter()
            .find(|d| d.is(coordinate, self))
            .and_then(|d| d.version.as_deref())
            .map(|v| self.interpolate(v))
            .filter(|v| !v.is_empty())
    }
}

/// Parse a POM XML string into a [`Pom`].
pub fn parse_pom(xml: &str) -> Result<Pom, PomsmithError> {
    Ok(Pom::from_document(&XmlDocument::parse(xml)?))
}

/// Read and parse a POM file.
pub fn read_pom(path: &Path) -> Result<Pom, PomsmithError> {
    let xml = fs::read_to_string(path).map_err(|e| PomsmithError::Manifest {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    parse_pom(&xml).map_err(|e| PomsmithError::Manifest {
        message: format!("{}: {e}", path.display()),
    })
}
