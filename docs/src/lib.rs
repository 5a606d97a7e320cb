//! Ontology documentation renderers.
//!
//! Turns a [`DocumentModel`] into text. Every renderer is a pure function of
//! the model: no clock, no environment, no I/O. Rendering the same model twice
//! yields byte-identical output.
//!
//! # Entry Points
//!
//! ```no_run
//! use std::path::Path;
//! use ontodoc_docs::{render, write_artifacts, Format};
//! use ontodoc_ontology::{generate, Config};
//!
//! let model = generate(Path::new("cmeo.rdf"), None, &Config::default())
//!     .expect("ontology should load");
//! let html = render(&model, Format::Html).expect("model should render");
//! write_artifacts(Path::new("public"), &model, &Format::ALL, "cmeo")
//!     .expect("artifacts should be written");
//! ```
//!
//! # Structure
//!
//! ```text
//! public/
//!   index.html    ← links every artifact, with headline counts
//!   cmeo.html     ← self-contained page, CSS embedded
//!   cmeo.md
//!   cmeo.json
//! ```
//!
//! Every document lists, in order: summary, classes by category, properties
//! by namespace, named individuals, known vocabularies, skipped entities.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod html;
pub mod index;
pub mod json;
pub mod markdown;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use ontodoc_ontology::DocumentModel;

pub use writer::{render_artifacts, write_artifacts, Artifact};

/// Output format of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    /// Self-contained HTML page.
    Html,
    /// CommonMark document.
    Markdown,
    /// Pretty-printed JSON.
    Json,
}

impl Format {
    /// Every format, in the order artifacts are written.
    pub const ALL: [Format; 3] = [Format::Html, Format::Markdown, Format::Json];

    /// File extension for artifacts of this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Markdown => "md",
            Format::Json => "json",
        }
    }

    /// Canonical name, as accepted by [`Format::from_str`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Format::Html),
            "markdown" | "md" => Ok(Format::Markdown),
            "json" => Ok(Format::Json),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Rendering failures. Always raised before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The requested format name is not supported.
    #[error("unknown output format `{0}` (expected html, markdown, or json)")]
    UnknownFormat(String),
    /// JSON serialization failed.
    #[error("cannot serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Renders the model in the given format.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] if JSON serialization fails. HTML and
/// Markdown rendering cannot fail.
pub fn render(model: &DocumentModel, format: Format) -> Result<String, RenderError> {
    match format {
        Format::Html => Ok(html::render(model)),
        Format::Markdown => Ok(markdown::render(model)),
        Format::Json => json::render(model),
    }
}

/// Renders the model in a format given by name (`html`, `markdown`, `json`).
///
/// # Errors
///
/// Returns [`RenderError::UnknownFormat`] for an unsupported name, otherwise
/// whatever [`render`] returns.
pub fn render_named(model: &DocumentModel, format: &str) -> Result<String, RenderError> {
    render(model, format.parse()?)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ontodoc_ontology::model::{Annotation, EntityRole, SkipReason};
    use ontodoc_ontology::{
        CategoryBucket, ClassEntity, DocumentMeta, DocumentModel, Individual, NamespaceBucket,
        NamespaceKey, PropertyEntity, PropertyKind, SkippedEntity, Vocabulary,
    };

    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";

    pub fn model() -> DocumentModel {
        let mut design = ClassEntity::new(
            "https://w3id.org/CMEO/randomized_design",
            "Randomized Design",
            "Participants are <randomly> assigned & followed.",
        );
        design.subclass_of = vec!["https://w3id.org/CMEO/study_design".to_string()];
        design.annotations = vec![Annotation::new(ALT_LABEL, "RCT design")];

        let mut study_design =
            ClassEntity::new("https://w3id.org/CMEO/study_design", "Study Design", "");
        study_design.subclasses = vec!["https://w3id.org/CMEO/randomized_design".to_string()];

        let mut has_value =
            PropertyEntity::new("https://w3id.org/CMEO/has_value", "has value", PropertyKind::Data);
        has_value.domain = vec!["https://w3id.org/CMEO/BloodPressure".to_string()];
        has_value.subproperties = vec!["http://unknown.example/vocab#relatedTo".to_string()];

        let mut related_to = PropertyEntity::new(
            "http://unknown.example/vocab#relatedTo",
            "Related To",
            PropertyKind::Object,
        );
        related_to.description = "Links | anything".to_string();
        related_to.subproperty_of = vec!["https://w3id.org/CMEO/has_value".to_string()];

        DocumentModel {
            meta: DocumentMeta {
                title: "CMEO Documentation".to_string(),
                description: String::new(),
                source: "cmeo.ttl".to_string(),
                ontology_iri: Some("https://w3id.org/CMEO".to_string()),
                version: None,
            },
            categories: vec![
                CategoryBucket {
                    name: "Study Design".to_string(),
                    classes: vec![design, study_design],
                },
                CategoryBucket {
                    name: "Cohort & Population".to_string(),
                    classes: Vec::new(),
                },
                CategoryBucket {
                    name: "Other".to_string(),
                    classes: vec![ClassEntity::new(
                        "https://w3id.org/CMEO/BloodPressure",
                        "Blood Pressure",
                        "",
                    )],
                },
            ],
            namespaces: vec![
                NamespaceBucket {
                    key: NamespaceKey::Native,
                    name: "cmeo".to_string(),
                    iri: Some("https://w3id.org/CMEO/".to_string()),
                    properties: vec![has_value],
                },
                NamespaceBucket {
                    key: NamespaceKey::External,
                    name: "Other/External".to_string(),
                    iri: None,
                    properties: vec![related_to],
                },
            ],
            individuals: vec![Individual {
                identifier: "https://w3id.org/CMEO/site_a".to_string(),
                label: "Site A".to_string(),
                description: String::new(),
            }],
            vocabularies: vec![
                Vocabulary::new("cmeo", "https://w3id.org/CMEO/"),
                Vocabulary::new("obo", "http://purl.obolibrary.org/obo/"),
                Vocabulary::new("skos", "http://www.w3.org/2004/02/skos/core#"),
            ],
            skipped: vec![SkippedEntity {
                identifier: "_:b0".to_string(),
                role: EntityRole::Class,
                reason: SkipReason::Anonymous,
            }],
        }
    }
}
