//! Ontology-to-document transformation pipeline.
//!
//! Loads an OWL/RDF ontology, extracts its classes, properties, and named
//! individuals, assigns every class to a presentation category, groups
//! properties by the vocabulary that defines them, and returns the result as
//! a [`DocumentModel`] ready for rendering.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use ontodoc_ontology::{generate, Config};
//!
//! let model = generate(Path::new("cmeo.rdf"), None, &Config::default())
//!     .expect("ontology should load");
//! println!("{} classes", model.statistics().classes);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! loader ──▶ extractor ──┬─▶ categorizer ──┐
//!                        └─▶ partition ────┴─▶ DocumentModel
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod categorizer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod iris;
pub mod loader;
pub mod model;
pub mod partition;

use std::path::Path;

pub use categorizer::{CategoryRule, Categorizer, DEFAULT_CATEGORY};
pub use config::Config;
pub use error::{Error, Result};
pub use graph::{OntologyGraph, TripleStore};
pub use loader::Syntax;
pub use model::{
    Annotation, CategoryBucket, ClassEntity, DocumentMeta, DocumentModel, Individual, NamespaceBucket,
    NamespaceKey, PropertyEntity, PropertyKind, SkippedEntity, Statistics, Vocabulary,
};
pub use partition::NamespacePartitioner;

use extractor::{extract, Extraction};

/// Loads the ontology at `path` and builds its documentation model.
///
/// `syntax` overrides extension-based format detection.
///
/// # Errors
///
/// Returns a load error if the file cannot be read or parsed. Entities that
/// cannot be extracted are not errors; they are listed in
/// [`DocumentModel::skipped`].
pub fn generate(path: &Path, syntax: Option<Syntax>, config: &Config) -> Result<DocumentModel> {
    let graph = loader::load(path, syntax)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(build_model(&graph, &source, config))
}

/// Builds the documentation model from an already loaded graph.
pub fn build_model<G: OntologyGraph + ?Sized>(
    graph: &G,
    source: &str,
    config: &Config,
) -> DocumentModel {
    let extraction = extract(graph);
    let partitioner = namespace_partitioner(config, &extraction);
    let categories = config.categorizer().bucket(extraction.classes);
    let namespaces = partitioner.partition(extraction.properties);

    let header = extraction.header;
    let meta = DocumentMeta {
        title: config
            .document
            .title
            .clone()
            .or_else(|| header.title.clone())
            .unwrap_or_else(|| source.to_string()),
        description: config
            .document
            .description
            .clone()
            .or(header.description)
            .unwrap_or_default(),
        source: source.to_string(),
        ontology_iri: header.iri,
        version: header.version,
    };

    let model = DocumentModel {
        meta,
        categories,
        namespaces,
        individuals: extraction.individuals,
        vocabularies: partitioner.vocabularies(),
        skipped: extraction.skipped,
    };

    let stats = model.statistics();
    tracing::info!(
        classes = stats.classes,
        properties = stats.properties,
        individuals = stats.individuals,
        skipped = stats.skipped,
        "built documentation model"
    );
    model
}

/// Resolves the native vocabulary. Configured values win; otherwise the
/// namespace is inferred from the `owl:Ontology` IRI and the declared terms.
fn namespace_partitioner(config: &Config, extraction: &Extraction) -> NamespacePartitioner {
    let ontology_iri = extraction.header.iri.as_deref();
    let native_iri = match (&config.namespaces.native, ontology_iri) {
        (Some(iri), _) => iri.clone(),
        (None, Some(iri)) => {
            let identifiers = extraction
                .classes
                .iter()
                .map(|c| c.identifier.as_str())
                .chain(extraction.properties.iter().map(|p| p.identifier.as_str()))
                .chain(extraction.individuals.iter().map(|i| i.identifier.as_str()));
            partition::infer_native_namespace(iri, identifiers)
        }
        (None, None) => String::new(),
    };
    let native_prefix = config
        .namespaces
        .native_prefix
        .clone()
        .unwrap_or_else(|| partition::derive_prefix(ontology_iri.unwrap_or(&native_iri)));
    tracing::debug!(prefix = %native_prefix, iri = %native_iri, "native namespace");
    NamespacePartitioner::new(
        Vocabulary::new(native_prefix, native_iri),
        config.namespaces.imported.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Triple};

    fn graph() -> TripleStore {
        let ty = iris::RDF_TYPE;
        vec![
            Triple::new(
                Node::iri("http://example.org/onto"),
                ty,
                Node::iri(iris::OWL_ONTOLOGY),
            ),
            Triple::new(
                Node::iri("http://example.org/onto"),
                iris::RDFS_LABEL,
                Node::literal("Example Ontology"),
            ),
            Triple::new(
                Node::iri("http://example.org/onto/Cohort"),
                ty,
                Node::iri(iris::OWL_CLASS),
            ),
            Triple::new(
                Node::iri("http://example.org/onto/hasMember"),
                ty,
                Node::iri(iris::OWL_OBJECT_PROPERTY),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn native_namespace_is_inferred_from_ontology_iri() {
        let model = build_model(&graph(), "example.ttl", &Config::default());
        assert_eq!(model.namespaces.len(), 1);
        assert_eq!(model.namespaces[0].key, NamespaceKey::Native);
        assert_eq!(model.namespaces[0].name, "onto");
        assert_eq!(
            model.namespaces[0].iri.as_deref(),
            Some("http://example.org/onto/")
        );
    }

    #[test]
    fn hash_namespace_ontology_keeps_its_properties_native() -> Result<()> {
        let config = Config::from_toml("[namespaces]\nnative_prefix = \"ex\"\nimported = []")?;
        let ty = iris::RDF_TYPE;
        let graph: TripleStore = vec![
            Triple::new(
                Node::iri("http://example.org/ont"),
                ty,
                Node::iri(iris::OWL_ONTOLOGY),
            ),
            Triple::new(
                Node::iri("http://example.org/ont#hasDate"),
                ty,
                Node::iri(iris::OWL_DATATYPE_PROPERTY),
            ),
            Triple::new(
                Node::iri("http://example.org/ont#Visit"),
                ty,
                Node::iri(iris::OWL_CLASS),
            ),
        ]
        .into_iter()
        .collect();

        let model = build_model(&graph, "ont.ttl", &config);
        let buckets: Vec<(NamespaceKey, Option<&str>)> = model
            .namespaces
            .iter()
            .map(|b| (b.key.clone(), b.iri.as_deref()))
            .collect();
        assert_eq!(
            buckets,
            vec![(NamespaceKey::Native, Some("http://example.org/ont#"))]
        );
        assert_eq!(
            model.vocabularies,
            vec![Vocabulary::new("ex", "http://example.org/ont#")]
        );
        Ok(())
    }

    #[test]
    fn configured_native_namespace_wins_over_inference() {
        let mut config = Config::default();
        config.namespaces.native = Some("http://elsewhere.example/".into());
        config.namespaces.native_prefix = Some("else".into());
        let model = build_model(&graph(), "example.ttl", &config);
        assert_eq!(model.namespaces.len(), 1);
        assert_eq!(model.namespaces[0].key, NamespaceKey::External);
        assert_eq!(model.vocabularies[0], Vocabulary::new("else", "http://elsewhere.example/"));
    }

    #[test]
    fn title_falls_back_to_ontology_label() {
        let model = build_model(&graph(), "example.ttl", &Config::default());
        assert_eq!(model.meta.title, "Example Ontology");
        assert_eq!(model.meta.description, "");
        assert_eq!(model.meta.source, "example.ttl");
    }

    #[test]
    fn configured_title_wins() {
        let mut config = Config::default();
        config.document.title = Some("CMEO".into());
        assert_eq!(build_model(&graph(), "x", &config).meta.title, "CMEO");
    }

    #[test]
    fn statistics_match_buckets() {
        let model = build_model(&graph(), "example.ttl", &Config::default());
        let stats = model.statistics();
        assert_eq!(stats.classes, 1);
        assert_eq!(stats.properties, 1);
        assert_eq!(stats.object_properties, 1);
        assert_eq!(stats.per_category.len(), 20);
        assert_eq!(
            stats.per_category.iter().map(|c| c.count).sum::<usize>(),
            model.classes().count()
        );
    }
}
