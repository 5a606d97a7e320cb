//! Generator configuration: document text, namespaces, and category rules.
//!
//! [`Config::default`] carries the reference clinical-metadata categories and
//! imported vocabularies; the native namespace is inferred from the loaded
//! ontology unless configured. A TOML file may override any top-level
//! section; omitted sections keep their defaults.
//!
//! ```toml
//! default_category = "Other"
//!
//! [document]
//! title = "CMEO Ontology Documentation"
//!
//! [namespaces]
//! native = "https://w3id.org/CMEO/"
//! native_prefix = "cmeo"
//!
//! [[categories]]
//! name = "Study Design"
//! keywords = ["design", "trial"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::categorizer::{reference_rules, CategoryRule, Categorizer, DEFAULT_CATEGORY};
use crate::error::{Error, Result};
use crate::iris;
use crate::model::Vocabulary;

/// Known vocabularies a clinical metadata ontology typically imports.
const KNOWN_VOCABULARIES: &[(&str, &str)] = &[
    ("omop", "http://omop.org/OMOP/"),
    ("omop_ext", "http://omop.org/omopextension/"),
    ("atc", "http://purl.bioontology.org/ontology/ATC/"),
    ("rxnorm", "http://purl.bioontology.org/ontology/RXNORM/"),
    ("snomedct", "http://purl.bioontology.org/ontology/SNOMEDCT/"),
    ("loinc", "http://purl.bioontology.org/ontology/LNC/"),
    ("icd10", "http://purl.bioontology.org/ontology/ICD10/"),
    ("icd9", "http://purl.bioontology.org/ontology/ICD9CM/"),
    ("ncbi", "http://purl.bioontology.org/ontology/NCBITAXON/"),
    ("ucum", "http://unitsofmeasure.org/"),
    ("obo", "http://purl.obolibrary.org/obo/"),
    ("obi", "http://purl.obolibrary.org/obo/obi.owl/"),
    ("obcs", "http://purl.obolibrary.org/obo/obcs.owl/"),
    ("bfo", "http://purl.obolibrary.org/obo/bfo.owl/"),
    ("stato", "http://purl.obolibrary.org/obo/stato.owl/"),
    ("ro", "http://purl.obolibrary.org/obo/ro.owl/"),
    ("iao", "http://purl.obolibrary.org/obo/iao.owl/"),
    ("duo", "http://purl.obolibrary.org/obo/duo.owl/"),
    ("sio", "http://semanticscience.org/ontology/sio.owl/"),
    ("time", "http://www.w3.org/2006/time#"),
    ("owl", iris::OWL),
    ("rdf", iris::RDF),
    ("rdfs", iris::RDFS),
    ("xsd", iris::XSD),
    ("skos", iris::SKOS),
    ("dc", iris::DC),
    ("dcterms", iris::DCTERMS),
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document title and introduction.
    pub document: DocumentConfig,
    /// Native and imported namespaces.
    pub namespaces: NamespaceConfig,
    /// Ordered category rules; earlier rules take priority.
    pub categories: Vec<CategoryRule>,
    /// Category for classes no rule matches.
    pub default_category: String,
}

/// Document text overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Title; falls back to the ontology's own title, then the file name.
    pub title: Option<String>,
    /// Introductory paragraph; falls back to the ontology's description.
    pub description: Option<String>,
}

/// Namespace partitioning setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Native namespace IRI. When absent, it is inferred from the
    /// `owl:Ontology` IRI and the terms declared under it.
    pub native: Option<String>,
    /// Prefix shown for the native namespace. When absent, it is derived
    /// from the last segment of the ontology IRI.
    pub native_prefix: Option<String>,
    /// Known imported vocabularies.
    pub imported: Vec<Vocabulary>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            native: None,
            native_prefix: None,
            imported: KNOWN_VOCABULARIES
                .iter()
                .map(|(prefix, iri)| Vocabulary::new(*prefix, *iri))
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: DocumentConfig::default(),
            namespaces: NamespaceConfig::default(),
            categories: reference_rules(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl Config {
    /// Reads a TOML configuration file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, and
    /// [`Error::InvalidConfig`] if it fails [`Config::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), categories = config.categories.len(), "loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on TOML errors and [`Error::InvalidConfig`]
    /// on validation failures.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks category names and keywords.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for empty or duplicate category names,
    /// categories without keywords, a default category that collides with a
    /// rule, or an empty native namespace or prefix.
    pub fn validate(&self) -> Result<()> {
        if self.default_category.trim().is_empty() {
            return Err(Error::InvalidConfig("default_category is empty".into()));
        }
        if self.namespaces.native.as_deref().is_some_and(|iri| iri.trim().is_empty()) {
            return Err(Error::InvalidConfig("namespaces.native is empty".into()));
        }
        if self
            .namespaces
            .native_prefix
            .as_deref()
            .is_some_and(|prefix| prefix.trim().is_empty())
        {
            return Err(Error::InvalidConfig("namespaces.native_prefix is empty".into()));
        }
        let mut names = HashSet::new();
        for rule in &self.categories {
            if rule.name.trim().is_empty() {
                return Err(Error::InvalidConfig("category with an empty name".into()));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate category `{}`",
                    rule.name
                )));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::InvalidConfig(format!(
                    "category `{}` has no keywords",
                    rule.name
                )));
            }
        }
        if names.contains(self.default_category.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "default category `{}` is also a rule",
                self.default_category
            )));
        }
        Ok(())
    }

    /// Builds the categorizer described by this configuration.
    #[must_use]
    pub fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.categories.clone(), self.default_category.clone())
    }
}
