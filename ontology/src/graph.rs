//! In-memory triple graph and the read-only capability interface the
//! extractor works against.
//!
//! [`OntologyGraph`] is small: the extractor lists typed subjects, reads the
//! objects of a `(subject, predicate)` pair, finds the subjects pointing at an
//! IRI, and walks a subject's statements. Everything else
//! ([`OntologyGraph::annotation`], [`OntologyGraph::related`],
//! [`OntologyGraph::related_from`], [`OntologyGraph::literal_annotations`]) is
//! derived from those four operations.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::iris;
use crate::model::{Annotation, PropertyKind};

/// An RDF term as held by the [`TripleStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, by its local label.
    Blank(String),
    /// A literal: lexical form plus optional language tag.
    Literal {
        /// Lexical form.
        value: String,
        /// Language tag (lower-cased), if any.
        language: Option<String>,
    },
}

impl Node {
    /// Creates an IRI node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    /// Creates a plain literal with no language tag.
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            language: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    /// Returns the IRI if this node is an IRI.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(id) => write!(f, "_:{id}"),
            Node::Literal {
                value,
                language: Some(lang),
            } => write!(f, "{value:?}@{lang}"),
            Node::Literal {
                value,
                language: None,
            } => write!(f, "{value:?}"),
        }
    }
}

/// A single subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Subject (IRI or blank node).
    pub subject: Node,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Node,
}

impl Triple {
    /// Builds a triple from its parts.
    pub fn new(subject: Node, predicate: impl Into<String>, object: Node) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// Which annotation to read for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Display label: `rdfs:label`, then `skos:prefLabel`.
    Label,
    /// Free-text description: `rdfs:comment`, `skos:definition`,
    /// `dcterms:description`, `dc:description`, IAO definition.
    Description,
    /// Document title: `dcterms:title`, `dc:title`, `rdfs:label`.
    Title,
    /// `owl:versionInfo`.
    Version,
}

impl AnnotationKind {
    /// Predicates consulted for this annotation, in priority order.
    #[must_use]
    pub fn predicates(self) -> &'static [&'static str] {
        match self {
            AnnotationKind::Label => &[iris::RDFS_LABEL, iris::SKOS_PREF_LABEL],
            AnnotationKind::Description => &[
                iris::RDFS_COMMENT,
                iris::SKOS_DEFINITION,
                iris::DCTERMS_DESCRIPTION,
                iris::DC_DESCRIPTION,
                iris::IAO_DEFINITION,
            ],
            AnnotationKind::Title => &[iris::DCTERMS_TITLE, iris::DC_TITLE, iris::RDFS_LABEL],
            AnnotationKind::Version => &[iris::OWL_VERSION_INFO],
        }
    }
}

/// Named-resource relations surfaced in the documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `rdfs:subClassOf`.
    SubClassOf,
    /// `owl:equivalentClass`.
    EquivalentClass,
    /// `owl:disjointWith`.
    DisjointWith,
    /// `rdfs:domain`.
    Domain,
    /// `rdfs:range`.
    Range,
    /// `rdfs:subPropertyOf`.
    SubPropertyOf,
    /// `owl:equivalentProperty`.
    EquivalentProperty,
    /// `owl:inverseOf`.
    InverseOf,
}

impl Relation {
    /// The predicate IRI for this relation.
    #[must_use]
    pub fn predicate(self) -> &'static str {
        match self {
            Relation::SubClassOf => iris::RDFS_SUBCLASS_OF,
            Relation::EquivalentClass => iris::OWL_EQUIVALENT_CLASS,
            Relation::DisjointWith => iris::OWL_DISJOINT_WITH,
            Relation::Domain => iris::RDFS_DOMAIN,
            Relation::Range => iris::RDFS_RANGE,
            Relation::SubPropertyOf => iris::RDFS_SUBPROPERTY_OF,
            Relation::EquivalentProperty => iris::OWL_EQUIVALENT_PROPERTY,
            Relation::InverseOf => iris::OWL_INVERSE_OF,
        }
    }
}

/// Read-only view of a loaded ontology graph.
pub trait OntologyGraph {
    /// Subjects with an `rdf:type` of `type_iri`, in first-encountered order,
    /// without duplicates.
    fn typed_subjects(&self, type_iri: &str) -> Vec<Node>;

    /// Objects of every `(subject, predicate, ?)` statement, in source order.
    fn objects(&self, subject: &str, predicate: &str) -> Vec<Node>;

    /// Subjects of every `(?, predicate, object)` statement whose object is
    /// the IRI `object`, in source order.
    fn subjects(&self, predicate: &str, object: &str) -> Vec<Node>;

    /// Every `(predicate, object)` pair stated about `subject`, in source
    /// order.
    fn statements(&self, subject: &str) -> Vec<(String, Node)>;

    /// Class candidates (`owl:Class`, then any additional `rdfs:Class`).
    fn classes(&self) -> Vec<Node> {
        let mut seen = HashSet::new();
        self.typed_subjects(iris::OWL_CLASS)
            .into_iter()
            .chain(self.typed_subjects(iris::RDFS_CLASS))
            .filter(|node| seen.insert(node.clone()))
            .collect()
    }

    /// Property candidates with their kind. A subject declared as both kinds
    /// is reported once, as an object property.
    fn properties(&self) -> Vec<(Node, PropertyKind)> {
        let mut seen = HashSet::new();
        let object = self
            .typed_subjects(iris::OWL_OBJECT_PROPERTY)
            .into_iter()
            .map(|n| (n, PropertyKind::Object));
        let data = self
            .typed_subjects(iris::OWL_DATATYPE_PROPERTY)
            .into_iter()
            .map(|n| (n, PropertyKind::Data));
        object
            .chain(data)
            .filter(|(node, _)| seen.insert(node.clone()))
            .collect()
    }

    /// Named individual candidates.
    fn individuals(&self) -> Vec<Node> {
        self.typed_subjects(iris::OWL_NAMED_INDIVIDUAL)
    }

    /// Reads an annotation for `identifier`.
    ///
    /// Predicates are tried in [`AnnotationKind::predicates`] order; for each,
    /// an English or untagged literal is preferred over other languages.
    /// Blank values are ignored.
    fn annotation(&self, identifier: &str, kind: AnnotationKind) -> Option<String> {
        kind.predicates()
            .iter()
            .find_map(|predicate| preferred_literal(&self.objects(identifier, predicate)))
    }

    /// IRIs related to `identifier` through `relation`. Anonymous (blank node)
    /// targets are dropped.
    fn related(&self, identifier: &str, relation: Relation) -> Vec<String> {
        let mut seen = HashSet::new();
        self.objects(identifier, relation.predicate())
            .into_iter()
            .filter_map(|node| match node {
                Node::Iri(iri) => Some(iri),
                _ => None,
            })
            .filter(|iri| seen.insert(iri.clone()))
            .collect()
    }

    /// Named resources pointing at `identifier` through `relation`, such as
    /// the subclasses of a class.
    fn related_from(&self, identifier: &str, relation: Relation) -> Vec<String> {
        let mut seen = HashSet::new();
        self.subjects(relation.predicate(), identifier)
            .into_iter()
            .filter_map(|node| match node {
                Node::Iri(iri) => Some(iri),
                _ => None,
            })
            .filter(|iri| seen.insert(iri.clone()))
            .collect()
    }

    /// Literal statements about `identifier` whose predicate is neither
    /// `rdf:type` nor one of `consumed`. Blank values and exact repeats are
    /// dropped.
    fn literal_annotations(&self, identifier: &str, consumed: &[&str]) -> Vec<Annotation> {
        let mut seen = HashSet::new();
        self.statements(identifier)
            .into_iter()
            .filter(|(predicate, _)| {
                predicate != iris::RDF_TYPE && !consumed.contains(&predicate.as_str())
            })
            .filter_map(|(predicate, object)| match object {
                Node::Literal { value, .. } if !value.trim().is_empty() => {
                    Some(Annotation::new(predicate, value.trim()))
                }
                _ => None,
            })
            .filter(|annotation| seen.insert(annotation.clone()))
            .collect()
    }
}

fn preferred_literal(nodes: &[Node]) -> Option<String> {
    let mut fallback = None;
    for node in nodes {
        if let Node::Literal { value, language } = node {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let english = match language.as_deref() {
                None => true,
                Some(lang) => lang == "en" || lang.starts_with("en-"),
            };
            if english {
                return Some(value.to_string());
            }
            if fallback.is_none() {
                fallback = Some(value.to_string());
            }
        }
    }
    fallback
}

/// Owned, read-only triple graph produced by the loader.
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    triples: Vec<Triple>,
    by_subject: HashMap<String, Vec<usize>>,
    by_object: HashMap<String, Vec<usize>>,
}

impl TripleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triple. Exact duplicates are ignored.
    pub fn insert(&mut self, triple: Triple) {
        if let Some(subject) = subject_key(&triple.subject) {
            let indexes = self.by_subject.entry(subject).or_default();
            if indexes.iter().any(|&i| self.triples[i] == triple) {
                return;
            }
            indexes.push(self.triples.len());
        }
        if let Node::Iri(object) = &triple.object {
            self.by_object
                .entry(object.clone())
                .or_default()
                .push(self.triples.len());
        }
        self.triples.push(triple);
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the store holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates over all triples in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

/// Subjects are indexed by IRI or by `_:label`, so the two never collide.
fn subject_key(node: &Node) -> Option<String> {
    match node {
        Node::Iri(iri) => Some(iri.clone()),
        Node::Blank(id) => Some(format!("_:{id}")),
        Node::Literal { .. } => None,
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        for triple in iter {
            store.insert(triple);
        }
        store
    }
}

impl OntologyGraph for TripleStore {
    fn typed_subjects(&self, type_iri: &str) -> Vec<Node> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .filter(|t| t.predicate == iris::RDF_TYPE && t.object.as_iri() == Some(type_iri))
            .map(|t| t.subject.clone())
            .filter(|subject| seen.insert(subject.clone()))
            .collect()
    }

    fn objects(&self, subject: &str, predicate: &str) -> Vec<Node> {
        self.by_subject
            .get(subject)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|&i| &self.triples[i])
                    .filter(|t| t.predicate == predicate)
                    .map(|t| t.object.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn subjects(&self, predicate: &str, object: &str) -> Vec<Node> {
        self.by_object
            .get(object)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|&i| &self.triples[i])
                    .filter(|t| t.predicate == predicate)
                    .map(|t| t.subject.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn statements(&self, subject: &str) -> Vec<(String, Node)> {
        self.by_subject
            .get(subject)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|&i| &self.triples[i])
                    .map(|t| (t.predicate.clone(), t.object.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
