//! Adding dependency declarations to a `pom.xml`.
//!
//! [`PomEditor`] owns the document and a model derived from it on demand.
//! Every successful insertion marks the model stale, so the next lookup of
//! managed versions or declared siblings sees the new entry.

use std::fs;
use std::path::{Path, PathBuf};

use pomsmith_core::dependency::{DependencyDeclaration, DependencyScope};
use pomsmith_core::tree::{self, Insertion};
use pomsmith_resolver::session::{
    ResolutionContext, VersionDecision, VersionRequest, VersionResolver,
};
use pomsmith_resolver::source::{ManagedVersions, VersionCatalog};
use pomsmith_util::errors::PomsmithError;

use crate::order;
use crate::pom::Pom;
use crate::xml::{Element, XmlDocument};

/// What to add: the version request plus how the entry is declared.
#[derive(Debug, Clone)]
pub struct DependencyAddition {
    pub request: VersionRequest,
    pub scope: Option<DependencyScope>,
    pub optional: bool,
}

/// Result of [`PomEditor::add_dependency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The declaration was written.
    Added {
        declaration: DependencyDeclaration,
        decision: VersionDecision,
        created_container: bool,
    },
    /// An identical declaration is already present.
    Unchanged { declaration: DependencyDeclaration },
    /// The coordinate is already declared, with this version text.
    AlreadyDeclared { version: Option<String> },
}

pub struct PomEditor {
    path: Option<PathBuf>,
    document: XmlDocument,
    ancestors: Option<Pom>,
    model: Option<Pom>,
}

impl PomEditor {
    /// Edit an in-memory document that has no parent on disk.
    pub fn parse(xml: &str) -> Result<Self, PomsmithError> {
        let document = XmlDocument::parse(xml)?;
        if document.root().name() != "project" {
            return Err(PomsmithError::Manifest {
                message: format!(
                    "Expected a <project> root element, found <{}>",
                    document.root().name()
                ),
            });
        }
        Ok(Self {
            path: None,
            document,
            ancestors: None,
            model: None,
        })
    }

    /// Open `path` and load the parent POMs reachable from it.
    pub fn open(path: &Path) -> Result<Self, PomsmithError> {
        let xml = fs::read_to_string(path).map_err(|e| PomsmithError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let mut editor = Self::parse(&xml)?;
        editor.ancestors = Pom::from_document(&editor.document).load_ancestors(path)?;
        editor.path = Some(path.to_path_buf());
        Ok(editor)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    pub fn to_xml(&self) -> String {
        self.document.to_xml()
    }

    /// Whether the model must be re-derived before its next use.
    pub fn is_stale(&self) -> bool {
        self.model.is_none()
    }

    /// The effective model: this document merged with its ancestors.
    pub fn model(&mut self) -> &Pom {
        let document = &self.document;
        let ancestors = &self.ancestors;
        self.model.get_or_insert_with(|| {
            tracing::debug!("deriving POM model");
            let mut pom = Pom::from_document(document);
            if let Some(parent) = ancestors {
                pom.apply_parent(parent);
            }
            pom
        })
    }

    /// Write the document back to the file it was opened from.
    pub fn save(&self) -> Result<(), PomsmithError> {
        let path = self.path.as_deref().ok_or_else(|| PomsmithError::Generic {
            message: "Document was not opened from a file".to_string(),
        })?;
        fs::write(path, self.to_xml())?;
        Ok(())
    }

    /// Resolve a version for `addition` and insert the declaration.
    ///
    /// Nothing is written when resolution fails or the coordinate is
    /// already declared.
    pub fn add_dependency<C>(
        &mut self,
        resolver: &mut VersionResolver<'_, C>,
        addition: &DependencyAddition,
    ) -> Result<AddOutcome, PomsmithError>
    where
        C: VersionCatalog + ?Sized,
    {
        let coordinate = &addition.request.coordinate;
        let (declaration, decision) = {
            let model = self.model();
            if let Some(existing) = model.declared(coordinate) {
                tracing::info!("{coordinate} is already declared");
                return Ok(AddOutcome::AlreadyDeclared {
                    version: existing.version.clone(),
                });
            }
            let siblings = model.siblings();
            let ctx = ResolutionContext {
                managed: Some(model as &dyn ManagedVersions),
                siblings: &siblings,
            };
            let decision = resolver.resolve(&addition.request, &ctx)?;
            let declaration = DependencyDeclaration {
                coordinate: coordinate.clone(),
                version: decision.explicit_version().map(str::to_string),
                scope: addition.scope,
                optional: addition.optional,
            };
            (declaration, decision)
        };

        match self.insert_dependency(&declaration)? {
            Insertion::Inserted {
                created_container, ..
            } => Ok(AddOutcome::Added {
                declaration,
                decision,
                created_container,
            }),
            Insertion::AlreadyPresent => Ok(AddOutcome::Unchanged { declaration }),
        }
    }

    /// Place `declaration` inside `<dependencies>`, creating the container
    /// at its canonical position among `<project>`'s children if needed.
    pub fn insert_dependency(
        &mut self,
        declaration: &DependencyDeclaration,
    ) -> Result<Insertion, PomsmithError> {
        let project = self.document.root_mut();
        if project.name() != "project" {
            return Err(PomsmithError::Manifest {
                message: format!("Expected <project>, found <{}>", project.name()),
            });
        }
        let insertion = tree::insert_into_container(
            project,
            Element::new("dependencies"),
            render_dependency(declaration),
            order::project_element_order,
            order::dependency_order,
        );
        if insertion.is_inserted() {
            self.model = None;
        }
        Ok(insertion)
    }
}

/// The `<dependency>` element for `declaration`: groupId, artifactId,
/// version, type (unless `jar`), classifier, scope (unless `compile`),
/// optional (only when set).
pub fn render_dependency(declaration: &DependencyDeclaration) -> Element {
    let coordinate = &declaration.coordinate;
    let mut element = Element::new("dependency")
        .with_child(Element::leaf("groupId", &coordinate.group_id))
        .with_child(Element::leaf("artifactId", &coordinate.artifact_id));
    if let Some(version) = &declaration.version {
        element = element.with_child(Element::leaf("version", version));
    }
    if coordinate.effective_type() != pomsmith_core::dependency::DEFAULT_TYPE {
        element = element.with_child(Element::leaf("type", coordinate.effective_type()));
    }
    if let Some(classifier) = &coordinate.classifier {
        element = element.with_child(Element::leaf("classifier", classifier));
    }
    if let Some(scope) = declaration.written_scope() {
        element = element.with_child(Element::leaf("scope", scope.as_str()));
    }
    if declaration.optional {
        element = element.with_child(Element::leaf("optional", "true"));
    }
    element
}
