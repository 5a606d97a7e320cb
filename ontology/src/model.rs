//! Documentation model types.
//!
//! Entities are owned, immutable values produced by the extractor. The
//! [`DocumentModel`] groups them into category and namespace buckets; all
//! counts are derived from those buckets on demand via
//! [`DocumentModel::statistics`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a property relates two resources or a resource and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyKind {
    /// `owl:ObjectProperty`.
    #[serde(rename = "ObjectProperty")]
    Object,
    /// `owl:DatatypeProperty`.
    #[serde(rename = "DataProperty")]
    Data,
}

impl PropertyKind {
    /// Human-readable name used in rendered documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Object => "Object Property",
            PropertyKind::Data => "Data Property",
        }
    }
}

/// A literal annotation not otherwise surfaced (e.g. `skos:altLabel`,
/// `dcterms:created`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    /// Annotation property IRI.
    pub predicate: String,
    /// Literal value.
    pub value: String,
}

impl Annotation {
    /// Creates an annotation.
    pub fn new(predicate: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            value: value.into(),
        }
    }
}

/// An OWL class extracted from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntity {
    /// Full IRI.
    pub identifier: String,
    /// Display label (explicit or derived from the IRI).
    pub label: String,
    /// Description; empty when the graph has none.
    pub description: String,
    /// Named parent classes (`rdfs:subClassOf`).
    pub subclass_of: Vec<String>,
    /// Named classes declaring this one as a parent.
    pub subclasses: Vec<String>,
    /// Named equivalent classes (`owl:equivalentClass`).
    pub equivalent_to: Vec<String>,
    /// Named disjoint classes (`owl:disjointWith`).
    pub disjoint_with: Vec<String>,
    /// Remaining literal annotations, in source order.
    pub annotations: Vec<Annotation>,
}

impl ClassEntity {
    /// Creates a class with no relations.
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            description: description.into(),
            subclass_of: Vec::new(),
            subclasses: Vec::new(),
            equivalent_to: Vec::new(),
            disjoint_with: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

/// An OWL object or datatype property extracted from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntity {
    /// Full IRI.
    pub identifier: String,
    /// Display label (explicit or derived from the IRI).
    pub label: String,
    /// Description; empty when the graph has none.
    pub description: String,
    /// Object or data property.
    pub kind: PropertyKind,
    /// Namespace IRI owning the identifier (everything up to the local name).
    pub namespace: String,
    /// Named domain classes.
    pub domain: Vec<String>,
    /// Named range classes or datatypes.
    pub range: Vec<String>,
    /// Named parent properties (`rdfs:subPropertyOf`).
    pub subproperty_of: Vec<String>,
    /// Named properties declaring this one as a parent.
    pub subproperties: Vec<String>,
    /// Equivalent properties (`owl:equivalentProperty`).
    pub equivalent_to: Vec<String>,
    /// Inverse properties (`owl:inverseOf`).
    pub inverse_of: Vec<String>,
    /// Remaining literal annotations, in source order.
    pub annotations: Vec<Annotation>,
}

impl PropertyEntity {
    /// Creates a property with no relations. The namespace is derived from
    /// the identifier.
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        kind: PropertyKind,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            namespace: crate::extractor::namespace_of(&identifier).to_string(),
            label: label.into(),
            description: String::new(),
            kind,
            domain: Vec::new(),
            range: Vec::new(),
            subproperty_of: Vec::new(),
            subproperties: Vec::new(),
            equivalent_to: Vec::new(),
            inverse_of: Vec::new(),
            annotations: Vec::new(),
            identifier,
        }
    }
}

/// A named individual (`owl:NamedIndividual`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Individual {
    /// Full IRI.
    pub identifier: String,
    /// Display label.
    pub label: String,
    /// Description; empty when the graph has none.
    pub description: String,
}

/// Which kind of entity was being extracted when it was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityRole {
    /// A class candidate.
    Class,
    /// A property candidate.
    Property,
    /// A named individual candidate.
    Individual,
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityRole::Class => "class",
            EntityRole::Property => "property",
            EntityRole::Individual => "individual",
        })
    }
}

/// Why an entity could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The subject is a blank node (anonymous class expression, restriction).
    Anonymous,
    /// The identifier has no valid IRI scheme or contains whitespace.
    InvalidIri,
    /// The identifier has an empty local name and no explicit label.
    EmptyLocalName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Anonymous => "anonymous resource",
            SkipReason::InvalidIri => "invalid IRI",
            SkipReason::EmptyLocalName => "empty local name and no label",
        })
    }
}

/// A non-fatal extraction diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    /// Textual form of the offending subject.
    pub identifier: String,
    /// What was being extracted.
    pub role: EntityRole,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// A vocabulary: prefix plus namespace IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vocabulary {
    /// Short prefix (e.g. `obo`).
    pub prefix: String,
    /// Namespace IRI (e.g. `http://purl.obolibrary.org/obo/`).
    pub iri: String,
}

impl Vocabulary {
    /// Creates a vocabulary entry.
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }
}

/// A category with the classes assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    /// Category name.
    pub name: String,
    /// Classes, sorted by label.
    pub classes: Vec<ClassEntity>,
}

/// Identifies a property namespace bucket.
///
/// The derived ordering is the presentation order: native, then imported
/// vocabularies by prefix, then everything unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", content = "prefix", rename_all = "lowercase")]
pub enum NamespaceKey {
    /// The ontology's own namespace.
    Native,
    /// A known imported vocabulary, by prefix.
    Imported(String),
    /// Any namespace not in the known set.
    External,
}

/// Display name of the bucket holding unrecognized namespaces.
pub const EXTERNAL_BUCKET: &str = "Other/External";

/// A namespace with the properties defined in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceBucket {
    /// Bucket key.
    pub key: NamespaceKey,
    /// Display name: the vocabulary prefix, or [`EXTERNAL_BUCKET`].
    pub name: String,
    /// Namespace IRI, when the bucket corresponds to a single vocabulary.
    pub iri: Option<String>,
    /// Properties, sorted by label.
    pub properties: Vec<PropertyEntity>,
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMeta {
    /// Document title.
    pub title: String,
    /// Introductory description; may be empty.
    pub description: String,
    /// File name of the source ontology.
    pub source: String,
    /// `owl:Ontology` IRI, if declared.
    pub ontology_iri: Option<String>,
    /// `owl:versionInfo`, if declared.
    pub version: Option<String>,
}

/// Everything the renderers need, fully decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    /// Document metadata.
    pub meta: DocumentMeta,
    /// Category buckets in rule order; the default bucket is last.
    pub categories: Vec<CategoryBucket>,
    /// Property buckets in [`NamespaceKey`] order. Only non-empty buckets.
    pub namespaces: Vec<NamespaceBucket>,
    /// Named individuals, sorted by label.
    pub individuals: Vec<Individual>,
    /// Known vocabularies (native first), for the reference table.
    pub vocabularies: Vec<Vocabulary>,
    /// Entities the extractor had to skip.
    pub skipped: Vec<SkippedEntity>,
}

/// A `(name, count)` pair in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    /// Bucket display name.
    pub name: String,
    /// Number of entities in the bucket.
    pub count: usize,
}

/// Summary counts, always derived from the model's buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Total classes.
    pub classes: usize,
    /// Total properties.
    pub properties: usize,
    /// Object properties.
    pub object_properties: usize,
    /// Data properties.
    pub data_properties: usize,
    /// Named individuals.
    pub individuals: usize,
    /// Skipped entities.
    pub skipped: usize,
    /// Classes per category, in category order (including empty categories).
    pub per_category: Vec<BucketCount>,
    /// Properties per namespace bucket, in bucket order.
    pub per_namespace: Vec<BucketCount>,
}

impl DocumentModel {
    /// Iterates over every class across all category buckets.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.categories.iter().flat_map(|b| b.classes.iter())
    }

    /// Iterates over every property across all namespace buckets.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyEntity> {
        self.namespaces.iter().flat_map(|b| b.properties.iter())
    }

    /// Shortens `iri` to `prefix:local` using the longest matching known
    /// vocabulary, or returns it unchanged.
    #[must_use]
    pub fn compact_iri(&self, iri: &str) -> String {
        self.vocabularies
            .iter()
            .filter(|v| !v.iri.is_empty() && iri.len() > v.iri.len() && iri.starts_with(&v.iri))
            .max_by_key(|v| v.iri.len())
            .map_or_else(
                || iri.to_string(),
                |v| format!("{}:{}", v.prefix, &iri[v.iri.len()..]),
            )
    }

    /// Returns the non-empty category buckets.
    pub fn populated_categories(&self) -> impl Iterator<Item = &CategoryBucket> {
        self.categories.iter().filter(|b| !b.classes.is_empty())
    }

    /// Computes the summary counts from the current buckets.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let per_category: Vec<BucketCount> = self
            .categories
            .iter()
            .map(|b| BucketCount {
                name: b.name.clone(),
                count: b.classes.len(),
            })
            .collect();
        let per_namespace: Vec<BucketCount> = self
            .namespaces
            .iter()
            .map(|b| BucketCount {
                name: b.name.clone(),
                count: b.properties.len(),
            })
            .collect();
        let object_properties = self
            .properties()
            .filter(|p| p.kind == PropertyKind::Object)
            .count();
        let data_properties = self
            .properties()
            .filter(|p| p.kind == PropertyKind::Data)
            .count();

        Statistics {
            classes: per_category.iter().map(|c| c.count).sum(),
            properties: per_namespace.iter().map(|c| c.count).sum(),
            object_properties,
            data_properties,
            individuals: self.individuals.len(),
            skipped: self.skipped.len(),
            per_category,
            per_namespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(vocabularies: Vec<Vocabulary>) -> DocumentModel {
        DocumentModel {
            meta: DocumentMeta {
                title: String::new(),
                description: String::new(),
                source: String::new(),
                ontology_iri: None,
                version: None,
            },
            categories: Vec::new(),
            namespaces: Vec::new(),
            individuals: Vec::new(),
            vocabularies,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn compact_iri_uses_longest_vocabulary() {
        let model = model(vec![
            Vocabulary::new("obo", "http://purl.obolibrary.org/obo/"),
            Vocabulary::new("ro", "http://purl.obolibrary.org/obo/ro.owl/"),
            Vocabulary::new("empty", ""),
        ]);
        assert_eq!(model.compact_iri("http://purl.obolibrary.org/obo/ro.owl/part_of"), "ro:part_of");
        assert_eq!(model.compact_iri("http://purl.obolibrary.org/obo/IAO_0000115"), "obo:IAO_0000115");
        assert_eq!(model.compact_iri("http://purl.obolibrary.org/obo/"), "http://purl.obolibrary.org/obo/");
        assert_eq!(model.compact_iri("urn:x"), "urn:x");
    }
}
