//! Walks an [`OntologyGraph`] and produces owned class, property, and
//! individual entities.
//!
//! Extraction is best-effort: a candidate that cannot be given a usable
//! identifier is recorded as a [`SkippedEntity`] and the walk continues.

use std::collections::HashSet;

use crate::graph::{AnnotationKind, Node, OntologyGraph, Relation};
use crate::iris;
use crate::model::{
    Annotation, ClassEntity, EntityRole, Individual, PropertyEntity, SkipReason, SkippedEntity,
};

const CLASS_RELATIONS: &[Relation] = &[
    Relation::SubClassOf,
    Relation::EquivalentClass,
    Relation::DisjointWith,
];

const PROPERTY_RELATIONS: &[Relation] = &[
    Relation::Domain,
    Relation::Range,
    Relation::SubPropertyOf,
    Relation::EquivalentProperty,
    Relation::InverseOf,
];

/// Ontology-level header annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntologyHeader {
    /// `owl:Ontology` subject IRI.
    pub iri: Option<String>,
    /// Title annotation.
    pub title: Option<String>,
    /// Description annotation.
    pub description: Option<String>,
    /// `owl:versionInfo`.
    pub version: Option<String>,
}

/// The result of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Ontology header, if the graph declares an `owl:Ontology`.
    pub header: OntologyHeader,
    /// Classes, sorted by label.
    pub classes: Vec<ClassEntity>,
    /// Properties, in source order.
    pub properties: Vec<PropertyEntity>,
    /// Named individuals, sorted by label.
    pub individuals: Vec<Individual>,
    /// Candidates that were skipped.
    pub skipped: Vec<SkippedEntity>,
}

/// Extracts every documented entity from `graph`.
pub fn extract<G: OntologyGraph + ?Sized>(graph: &G) -> Extraction {
    let mut skipped = Vec::new();

    let mut classes: Vec<ClassEntity> =
        resolve_all(graph, graph.classes(), EntityRole::Class, &mut skipped)
            .into_iter()
            .map(|(identifier, label)| ClassEntity {
                description: description(graph, &identifier),
                subclass_of: graph.related(&identifier, Relation::SubClassOf),
                subclasses: graph.related_from(&identifier, Relation::SubClassOf),
                equivalent_to: graph.related(&identifier, Relation::EquivalentClass),
                disjoint_with: graph.related(&identifier, Relation::DisjointWith),
                annotations: annotations(graph, &identifier, CLASS_RELATIONS),
                identifier,
                label,
            })
            .collect();
    classes.sort_by(|a, b| label_order(&a.label, &a.identifier, &b.label, &b.identifier));

    let mut properties = Vec::new();
    let mut seen = HashSet::new();
    for (node, kind) in graph.properties() {
        let Some((identifier, label)) = resolve(graph, &node, EntityRole::Property, &mut skipped)
        else {
            continue;
        };
        if !seen.insert(identifier.clone()) {
            continue;
        }
        properties.push(PropertyEntity {
            description: description(graph, &identifier),
            kind,
            namespace: namespace_of(&identifier).to_string(),
            domain: graph.related(&identifier, Relation::Domain),
            range: graph.related(&identifier, Relation::Range),
            subproperty_of: graph.related(&identifier, Relation::SubPropertyOf),
            subproperties: graph.related_from(&identifier, Relation::SubPropertyOf),
            equivalent_to: graph.related(&identifier, Relation::EquivalentProperty),
            inverse_of: graph.related(&identifier, Relation::InverseOf),
            annotations: annotations(graph, &identifier, PROPERTY_RELATIONS),
            identifier,
            label,
        });
    }

    let mut individuals: Vec<Individual> =
        resolve_all(graph, graph.individuals(), EntityRole::Individual, &mut skipped)
            .into_iter()
            .map(|(identifier, label)| Individual {
                description: description(graph, &identifier),
                identifier,
                label,
            })
            .collect();
    individuals.sort_by(|a, b| label_order(&a.label, &a.identifier, &b.label, &b.identifier));

    tracing::debug!(
        classes = classes.len(),
        properties = properties.len(),
        individuals = individuals.len(),
        skipped = skipped.len(),
        "extracted entities"
    );

    Extraction {
        header: header(graph),
        classes,
        properties,
        individuals,
        skipped,
    }
}

/// Resolves a list of candidate nodes, dropping duplicates by identifier.
fn resolve_all<G: OntologyGraph + ?Sized>(
    graph: &G,
    nodes: Vec<Node>,
    role: EntityRole,
    skipped: &mut Vec<SkippedEntity>,
) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter_map(|node| resolve(graph, node, role, skipped))
        .filter(|(identifier, _)| seen.insert(identifier.clone()))
        .collect()
}

/// Resolves a candidate to `(identifier, label)`, or records why it cannot be.
fn resolve<G: OntologyGraph + ?Sized>(
    graph: &G,
    node: &Node,
    role: EntityRole,
    skipped: &mut Vec<SkippedEntity>,
) -> Option<(String, String)> {
    let outcome = match node {
        Node::Iri(iri) if !is_valid_iri(iri) => Err(SkipReason::InvalidIri),
        Node::Iri(iri) => match graph.annotation(iri, AnnotationKind::Label) {
            Some(label) => Ok((iri.clone(), label)),
            None => {
                let derived = humanize(local_name(iri));
                if derived.is_empty() {
                    Err(SkipReason::EmptyLocalName)
                } else {
                    Ok((iri.clone(), derived))
                }
            }
        },
        Node::Blank(_) | Node::Literal { .. } => Err(SkipReason::Anonymous),
    };

    match outcome {
        Ok(resolved) => Some(resolved),
        Err(reason) => {
            let identifier = node.to_string();
            // Anonymous class expressions are routine in OWL; keep them quiet.
            if reason == SkipReason::Anonymous {
                tracing::debug!(%identifier, %role, %reason, "skipping entity");
            } else {
                tracing::warn!(%identifier, %role, %reason, "skipping entity");
            }
            skipped.push(SkippedEntity {
                identifier,
                role,
                reason,
            });
            None
        }
    }
}

fn description<G: OntologyGraph + ?Sized>(graph: &G, identifier: &str) -> String {
    graph
        .annotation(identifier, AnnotationKind::Description)
        .unwrap_or_default()
}

/// Literal annotations other than the label, the description, and the
/// literal-valued forms of `relations`.
fn annotations<G: OntologyGraph + ?Sized>(
    graph: &G,
    identifier: &str,
    relations: &[Relation],
) -> Vec<Annotation> {
    let consumed: Vec<&str> = AnnotationKind::Label
        .predicates()
        .iter()
        .chain(AnnotationKind::Description.predicates())
        .copied()
        .chain(relations.iter().map(|r| r.predicate()))
        .collect();
    graph.literal_annotations(identifier, &consumed)
}

fn header<G: OntologyGraph + ?Sized>(graph: &G) -> OntologyHeader {
    let Some(iri) = graph
        .typed_subjects(iris::OWL_ONTOLOGY)
        .into_iter()
        .find_map(|node| node.as_iri().map(str::to_string))
    else {
        return OntologyHeader::default();
    };
    OntologyHeader {
        title: graph.annotation(&iri, AnnotationKind::Title),
        description: graph.annotation(&iri, AnnotationKind::Description),
        version: graph.annotation(&iri, AnnotationKind::Version),
        iri: Some(iri),
    }
}

fn label_order(a_label: &str, a_id: &str, b_label: &str, b_id: &str) -> std::cmp::Ordering {
    a_label
        .to_lowercase()
        .cmp(&b_label.to_lowercase())
        .then_with(|| a_id.cmp(b_id))
}

/// Checks for an RFC 3987 scheme and the absence of whitespace.
fn is_valid_iri(iri: &str) -> bool {
    let Some((scheme, rest)) = iri.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty() && !iri.chars().any(char::is_whitespace)
}

/// Splits an IRI at its local-name separator (`#`, then `/`, then `:`).
fn split_iri(iri: &str) -> (&str, &str) {
    let cut = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .or_else(|| iri.rfind(':'))
        .map_or(0, |i| i + 1);
    iri.split_at(cut)
}

/// The namespace part of an IRI, including the trailing separator.
///
/// ```
/// use ontodoc_ontology::extractor::namespace_of;
/// assert_eq!(namespace_of("https://w3id.org/CMEO/has_value"), "https://w3id.org/CMEO/");
/// assert_eq!(namespace_of("http://www.w3.org/2002/07/owl#sameAs"), "http://www.w3.org/2002/07/owl#");
/// ```
#[must_use]
pub fn namespace_of(iri: &str) -> &str {
    split_iri(iri).0
}

/// The local name of an IRI (the final fragment or path segment).
#[must_use]
pub fn local_name(iri: &str) -> &str {
    split_iri(iri).1
}

/// Turns a local name into a display label.
///
/// Separators (`_`, `-`, `.`, `%20`) become spaces, camelCase boundaries are
/// split, and every word gets an upper-case first letter. Acronyms keep
/// their case.
///
/// ```
/// use ontodoc_ontology::extractor::humanize;
/// assert_eq!(humanize("BloodPressure"), "Blood Pressure");
/// assert_eq!(humanize("observational_study_design"), "Observational Study Design");
/// assert_eq!(humanize("HTTPServer"), "HTTP Server");
/// ```
#[must_use]
pub fn humanize(local: &str) -> String {
    let spaced = local.replace("%20", " ");
    let chars: Vec<char> = spaced.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | '.') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyKind;

    /// Minimal in-memory graph: typed subjects plus ordered statements.
    #[derive(Default)]
    struct FakeGraph {
        types: Vec<(Node, &'static str)>,
        statements: Vec<(String, &'static str, Node)>,
    }

    impl FakeGraph {
        fn typed(mut self, node: Node, type_iri: &'static str) -> Self {
            self.types.push((node, type_iri));
            self
        }

        fn with(mut self, subject: &str, predicate: &'static str, object: Node) -> Self {
            self.statements.push((subject.to_string(), predicate, object));
            self
        }
    }

    impl OntologyGraph for FakeGraph {
        fn typed_subjects(&self, type_iri: &str) -> Vec<Node> {
            self.types
                .iter()
                .filter(|(_, t)| *t == type_iri)
                .map(|(n, _)| n.clone())
                .collect()
        }

        fn objects(&self, subject: &str, predicate: &str) -> Vec<Node> {
            self.statements
                .iter()
                .filter(|(s, p, _)| s == subject && *p == predicate)
                .map(|(_, _, o)| o.clone())
                .collect()
        }

        fn subjects(&self, predicate: &str, object: &str) -> Vec<Node> {
            self.statements
                .iter()
                .filter(|(_, p, o)| *p == predicate && o.as_iri() == Some(object))
                .map(|(s, _, _)| Node::iri(s.as_str()))
                .collect()
        }

        fn statements(&self, subject: &str) -> Vec<(String, Node)> {
            self.statements
                .iter()
                .filter(|(s, _, _)| s == subject)
                .map(|(_, p, o)| ((*p).to_string(), o.clone()))
                .collect()
        }
    }

    const EX: &str = "http://example.org/ont#";

    fn ex(local: &str) -> String {
        format!("{EX}{local}")
    }

    #[test]
    fn missing_label_is_derived_from_fragment() {
        let graph = FakeGraph::default().typed(Node::iri(ex("BloodPressure")), iris::OWL_CLASS);
        let extraction = extract(&graph);
        assert_eq!(extraction.classes.len(), 1);
        assert_eq!(extraction.classes[0].label, "Blood Pressure");
        assert_eq!(extraction.classes[0].description, "");
    }

    #[test]
    fn explicit_label_and_comment_win() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("bp")), iris::OWL_CLASS)
            .with(&ex("bp"), iris::RDFS_LABEL, Node::literal("systolic blood pressure"))
            .with(&ex("bp"), iris::RDFS_COMMENT, Node::literal("Pressure during systole."));
        let class = &extract(&graph).classes[0];
        assert_eq!(class.label, "systolic blood pressure");
        assert_eq!(class.description, "Pressure during systole.");
    }

    #[test]
    fn definition_is_used_when_comment_is_missing() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("Visit")), iris::OWL_CLASS)
            .with(&ex("Visit"), iris::IAO_DEFINITION, Node::literal("An encounter."));
        assert_eq!(extract(&graph).classes[0].description, "An encounter.");
    }

    #[test]
    fn blank_and_invalid_subjects_are_skipped_not_fatal() {
        let graph = FakeGraph::default()
            .typed(Node::Blank("b0".into()), iris::OWL_CLASS)
            .typed(Node::iri("not an iri"), iris::OWL_CLASS)
            .typed(Node::iri("http://example.org/ont#"), iris::OWL_CLASS)
            .typed(Node::iri(ex("Kept")), iris::OWL_CLASS);
        let extraction = extract(&graph);
        assert_eq!(extraction.classes.len(), 1);
        let reasons: Vec<SkipReason> = extraction.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::Anonymous,
                SkipReason::InvalidIri,
                SkipReason::EmptyLocalName
            ]
        );
    }

    #[test]
    fn empty_local_name_with_label_is_kept() {
        let graph = FakeGraph::default()
            .typed(Node::iri("http://example.org/thing/"), iris::OWL_CLASS)
            .with("http://example.org/thing/", iris::RDFS_LABEL, Node::literal("Thing"));
        let extraction = extract(&graph);
        assert_eq!(extraction.classes.len(), 1);
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn classes_are_sorted_by_label_and_deduplicated() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("Zebra")), iris::OWL_CLASS)
            .typed(Node::iri(ex("apple")), iris::OWL_CLASS)
            .typed(Node::iri(ex("Mango")), iris::OWL_CLASS)
            .typed(Node::iri(ex("Zebra")), iris::RDFS_CLASS);
        let labels: Vec<String> = extract(&graph).classes.into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn properties_carry_kind_namespace_and_relations() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("hasUnit")), iris::OWL_OBJECT_PROPERTY)
            .typed(Node::iri(ex("hasValue")), iris::OWL_DATATYPE_PROPERTY)
            .with(&ex("hasUnit"), iris::RDFS_DOMAIN, Node::iri(ex("Measurement")))
            .with(&ex("hasUnit"), iris::RDFS_RANGE, Node::iri(ex("Unit")));
        let props = extract(&graph).properties;
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].kind, PropertyKind::Object);
        assert_eq!(props[0].namespace, EX);
        assert_eq!(props[0].domain, vec![ex("Measurement")]);
        assert_eq!(props[0].range, vec![ex("Unit")]);
        assert_eq!(props[1].kind, PropertyKind::Data);
        assert_eq!(props[1].label, "Has Value");
    }

    #[test]
    fn header_is_read_from_owl_ontology() {
        let graph = FakeGraph::default()
            .typed(Node::iri("https://w3id.org/CMEO"), iris::OWL_ONTOLOGY)
            .with("https://w3id.org/CMEO", iris::DCTERMS_TITLE, Node::literal("CMEO"))
            .with("https://w3id.org/CMEO", iris::OWL_VERSION_INFO, Node::literal("3.0"));
        let header = extract(&graph).header;
        assert_eq!(header.iri.as_deref(), Some("https://w3id.org/CMEO"));
        assert_eq!(header.title.as_deref(), Some("CMEO"));
        assert_eq!(header.version.as_deref(), Some("3.0"));
        assert_eq!(header.description, None);
    }

    #[test]
    fn humanize_handles_separators_and_case() {
        assert_eq!(humanize("blood-pressure"), "Blood Pressure");
        assert_eq!(humanize("hasValue"), "Has Value");
        assert_eq!(humanize("IAO_0000115"), "IAO 0000115");
        assert_eq!(humanize("HbA1c"), "Hb A1c");
        assert_eq!(humanize("study%20arm"), "Study Arm");
        assert_eq!(humanize("__"), "");
    }

    #[test]
    fn local_name_and_namespace_split() {
        assert_eq!(local_name("http://example.org/ont#BloodPressure"), "BloodPressure");
        assert_eq!(local_name("https://w3id.org/CMEO/visit"), "visit");
        assert_eq!(local_name("urn:example:thing"), "thing");
        assert_eq!(namespace_of("urn:example:thing"), "urn:example:");
    }

    #[test]
    fn reverse_relations_are_collected() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("Study")), iris::OWL_CLASS)
            .typed(Node::iri(ex("Trial")), iris::OWL_CLASS)
            .typed(Node::iri(ex("hasPart")), iris::OWL_OBJECT_PROPERTY)
            .typed(Node::iri(ex("hasArm")), iris::OWL_OBJECT_PROPERTY)
            .with(&ex("Trial"), iris::RDFS_SUBCLASS_OF, Node::iri(ex("Study")))
            .with(&ex("hasArm"), iris::RDFS_SUBPROPERTY_OF, Node::iri(ex("hasPart")))
            .with(&ex("hasArm"), iris::OWL_EQUIVALENT_PROPERTY, Node::iri(ex("includesArm")));
        let extraction = extract(&graph);

        let study = extraction.classes.iter().find(|c| c.label == "Study");
        assert_eq!(study.map(|c| c.subclasses.clone()), Some(vec![ex("Trial")]));

        let has_part = extraction.properties.iter().find(|p| p.identifier == ex("hasPart"));
        assert_eq!(has_part.map(|p| p.subproperties.clone()), Some(vec![ex("hasArm")]));
        let has_arm = extraction.properties.iter().find(|p| p.identifier == ex("hasArm"));
        assert_eq!(has_arm.map(|p| p.equivalent_to.clone()), Some(vec![ex("includesArm")]));
    }

    #[test]
    fn other_literal_annotations_are_kept_in_order() {
        let graph = FakeGraph::default()
            .typed(Node::iri(ex("Visit")), iris::OWL_CLASS)
            .with(&ex("Visit"), iris::RDFS_LABEL, Node::literal("visit"))
            .with(&ex("Visit"), iris::RDFS_COMMENT, Node::literal("An encounter."))
            .with(&ex("Visit"), iris::SKOS_ALT_LABEL, Node::literal("encounter"))
            .with(&ex("Visit"), iris::DCTERMS_CREATED, Node::literal("2024-05-01"))
            .with(&ex("Visit"), iris::RDFS_SEE_ALSO, Node::iri(ex("Admission")));
        let class = &extract(&graph).classes[0];
        assert_eq!(
            class.annotations,
            vec![
                Annotation::new(iris::SKOS_ALT_LABEL, "encounter"),
                Annotation::new(iris::DCTERMS_CREATED, "2024-05-01"),
            ]
        );
    }
}
