//! Groups properties by the vocabulary that owns their identifier.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::extractor::namespace_of;
use crate::model::{NamespaceBucket, NamespaceKey, PropertyEntity, Vocabulary, EXTERNAL_BUCKET};

/// Splits properties into native, imported, and external buckets.
#[derive(Debug, Clone)]
pub struct NamespacePartitioner {
    native: Vocabulary,
    imported: Vec<Vocabulary>,
}

impl NamespacePartitioner {
    /// Creates a partitioner for an ontology whose own terms live under
    /// `native`, importing the `imported` vocabularies.
    #[must_use]
    pub fn new(native: Vocabulary, imported: Vec<Vocabulary>) -> Self {
        Self { native, imported }
    }

    /// The native vocabulary.
    #[must_use]
    pub fn native(&self) -> &Vocabulary {
        &self.native
    }

    /// Known vocabularies, native first.
    #[must_use]
    pub fn vocabularies(&self) -> Vec<Vocabulary> {
        std::iter::once(self.native.clone())
            .chain(self.imported.iter().cloned())
            .collect()
    }

    /// Returns the bucket key for a property identifier.
    ///
    /// The native namespace is checked first; among imported vocabularies the
    /// longest matching IRI wins, so `obo:` does not shadow a more specific
    /// OBO sub-namespace.
    #[must_use]
    pub fn key_for(&self, identifier: &str) -> NamespaceKey {
        if !self.native.iri.is_empty() && identifier.starts_with(&self.native.iri) {
            return NamespaceKey::Native;
        }
        self.imported
            .iter()
            .filter(|v| !v.iri.is_empty() && identifier.starts_with(&v.iri))
            .max_by_key(|v| v.iri.len())
            .map_or(NamespaceKey::External, |v| {
                NamespaceKey::Imported(v.prefix.clone())
            })
    }

    /// Partitions properties into non-empty buckets, ordered native →
    /// imported (by prefix) → external, each sorted by label.
    #[must_use]
    pub fn partition(&self, properties: Vec<PropertyEntity>) -> Vec<NamespaceBucket> {
        let mut groups: BTreeMap<NamespaceKey, Vec<PropertyEntity>> = BTreeMap::new();
        for property in properties {
            groups
                .entry(self.key_for(&property.identifier))
                .or_default()
                .push(property);
        }

        groups
            .into_iter()
            .map(|(key, mut properties)| {
                properties.sort_by(|a, b| {
                    a.label
                        .to_lowercase()
                        .cmp(&b.label.to_lowercase())
                        .then_with(|| a.identifier.cmp(&b.identifier))
                });
                let (name, iri) = match &key {
                    NamespaceKey::Native => {
                        (self.native.prefix.clone(), Some(self.native.iri.clone()))
                    }
                    NamespaceKey::Imported(prefix) => (
                        prefix.clone(),
                        self.imported
                            .iter()
                            .find(|v| &v.prefix == prefix)
                            .map(|v| v.iri.clone()),
                    ),
                    NamespaceKey::External => (EXTERNAL_BUCKET.to_string(), None),
                };
                NamespaceBucket {
                    key,
                    name,
                    iri,
                    properties,
                }
            })
            .collect()
    }
}

/// Infers the native namespace from the `owl:Ontology` IRI and the
/// identifiers of the terms the ontology declares.
///
/// The most common namespace among terms under the ontology IRI (the IRI
/// itself or the IRI followed by `/` or `#`) wins; ties
/// go to the shorter namespace. With no such terms, the ontology IRI itself
/// is used, with `/` appended when it has no trailing separator.
///
/// ```
/// use ontodoc_ontology::partition::infer_native_namespace;
/// let terms = ["http://example.org/ont#Visit", "http://example.org/ont#hasDate"];
/// assert_eq!(infer_native_namespace("http://example.org/ont", terms), "http://example.org/ont#");
/// assert_eq!(infer_native_namespace("http://example.org/ont", []), "http://example.org/ont/");
/// ```
#[must_use]
pub fn infer_native_namespace<'a>(
    ontology_iri: &str,
    identifiers: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for identifier in identifiers {
        let namespace = namespace_of(identifier);
        let under = namespace.strip_prefix(ontology_iri).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with(['/', '#']) || ontology_iri.ends_with(['/', '#'])
        });
        if under {
            *counts.entry(namespace).or_default() += 1;
        }
    }
    let best = counts
        .into_iter()
        .max_by_key(|&(namespace, count)| (count, Reverse(namespace.len()), Reverse(namespace)))
        .map(|(namespace, _)| namespace.to_string());
    match best {
        Some(namespace) => namespace,
        None if ontology_iri.ends_with('/') || ontology_iri.ends_with('#') => {
            ontology_iri.to_string()
        }
        None => format!("{ontology_iri}/"),
    }
}

/// Derives a display prefix from the last segment of an ontology IRI, with
/// any file extension removed. Falls back to `ns`.
///
/// ```
/// use ontodoc_ontology::partition::derive_prefix;
/// assert_eq!(derive_prefix("https://w3id.org/CMEO"), "cmeo");
/// assert_eq!(derive_prefix("http://purl.obolibrary.org/obo/iao.owl#"), "iao");
/// assert_eq!(derive_prefix("urn:"), "ns");
/// ```
#[must_use]
pub fn derive_prefix(ontology_iri: &str) -> String {
    let trimmed = ontology_iri.trim_end_matches(['/', '#']);
    let segment = trimmed
        .rsplit(['/', '#', ':'])
        .next()
        .unwrap_or_default();
    let stem = match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => segment,
    };
    let prefix: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if prefix.is_empty() {
        "ns".to_string()
    } else {
        prefix
    }
}
