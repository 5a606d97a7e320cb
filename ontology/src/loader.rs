//! Parses RDF/XML, Turtle, and N-Triples into a [`TripleStore`].
//!
//! Parsing is delegated to the sophia parsers; each parsed triple is copied
//! into owned [`Node`]s so nothing downstream depends on sophia's term types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as RdfTriple;

use crate::error::{Error, Result};
use crate::graph::{Node, Triple, TripleStore};

/// Serialization format of an ontology file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// RDF/XML (`.rdf`, `.owl`, `.xml`).
    RdfXml,
    /// Turtle (`.ttl`).
    Turtle,
    /// N-Triples (`.nt`).
    NTriples,
}

impl Syntax {
    /// Infers the syntax from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rdf" | "owl" | "xml" => Some(Syntax::RdfXml),
            "ttl" => Some(Syntax::Turtle),
            "nt" => Some(Syntax::NTriples),
            _ => None,
        }
    }
}

impl FromStr for Syntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rdfxml" | "rdf/xml" | "xml" | "rdf" | "owl" => Ok(Syntax::RdfXml),
            "turtle" | "ttl" => Ok(Syntax::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Syntax::NTriples),
            _ => Err(Error::UnknownSyntaxName(s.to_string())),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Syntax::RdfXml => "rdfxml",
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "ntriples",
        })
    }
}

/// Reads and parses an ontology file.
///
/// When `syntax` is `None` it is inferred from the file extension.
///
/// # Errors
///
/// Returns [`Error::UnknownSyntax`] if the syntax cannot be inferred, and
/// [`Error::Load`] if the file cannot be read or is not valid RDF.
pub fn load(path: &Path, syntax: Option<Syntax>) -> Result<TripleStore> {
    let syntax = match syntax {
        Some(syntax) => syntax,
        None => Syntax::from_path(path).ok_or_else(|| Error::UnknownSyntax {
            path: path.to_path_buf(),
        })?,
    };

    let text = std::fs::read_to_string(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let store = parse_text(&text, syntax).map_err(|message| Error::Load {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::info!(
        path = %path.display(),
        %syntax,
        triples = store.len(),
        "loaded ontology"
    );
    Ok(store)
}

/// Parses an in-memory document.
///
/// # Errors
///
/// Returns [`Error::Load`] (with the path `<memory>`) if the text is not
/// valid in the given syntax.
pub fn parse_str(text: &str, syntax: Syntax) -> Result<TripleStore> {
    parse_text(text, syntax).map_err(|message| Error::Load {
        path: PathBuf::from("<memory>"),
        message,
    })
}

fn parse_text(text: &str, syntax: Syntax) -> std::result::Result<TripleStore, String> {
    match syntax {
        Syntax::RdfXml => collect(sophia_xml::parser::parse_str(text)),
        Syntax::Turtle => collect(sophia_turtle::parser::turtle::parse_str(text)),
        Syntax::NTriples => collect(sophia_turtle::parser::nt::parse_str(text)),
    }
}

fn collect<S: TripleSource>(mut source: S) -> std::result::Result<TripleStore, String> {
    let mut store = TripleStore::new();
    let mut dropped = 0usize;
    source
        .for_each_triple(|t| match convert(&t) {
            Some(triple) => store.insert(triple),
            None => dropped += 1,
        })
        .map_err(|e| e.to_string())?;
    if dropped > 0 {
        tracing::debug!(dropped, "ignored triples with unsupported terms");
    }
    Ok(store)
}

fn convert<T: RdfTriple>(t: &T) -> Option<Triple> {
    let subject = node(t.s())?;
    let predicate = t.p().iri()?.as_str().to_string();
    let object = node(t.o())?;
    Some(Triple::new(subject, predicate, object))
}

/// Copies a sophia term; quoted triples and variables have no counterpart.
fn node<T: Term>(term: T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Node::Blank(id.as_str().to_string())),
        TermKind::Literal => term.lexical_form().map(|value| Node::Literal {
            value: value.to_string(),
            language: term.language_tag().map(|tag| tag.as_str().to_ascii_lowercase()),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AnnotationKind, OntologyGraph};
    use crate::iris;

    const TURTLE: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex:   <http://example.org/ont#> .

ex:BloodPressure a owl:Class ;
    rdfs:comment "Arterial pressure."@en .
ex:hasUnit a owl:ObjectProperty ;
    rdfs:label "has unit" .
"#;

    #[test]
    fn syntax_from_extension() {
        assert_eq!(Syntax::from_path(Path::new("a/cmeo.rdf")), Some(Syntax::RdfXml));
        assert_eq!(Syntax::from_path(Path::new("cmeo.OWL")), Some(Syntax::RdfXml));
        assert_eq!(Syntax::from_path(Path::new("cmeo.ttl")), Some(Syntax::Turtle));
        assert_eq!(Syntax::from_path(Path::new("cmeo.nt")), Some(Syntax::NTriples));
        assert_eq!(Syntax::from_path(Path::new("cmeo.json")), None);
        assert_eq!(Syntax::from_path(Path::new("cmeo")), None);
    }

    #[test]
    fn syntax_from_name() {
        assert_eq!("Turtle".parse::<Syntax>().ok(), Some(Syntax::Turtle));
        assert_eq!("rdfxml".parse::<Syntax>().ok(), Some(Syntax::RdfXml));
        assert!(matches!(
            "jsonld".parse::<Syntax>(),
            Err(Error::UnknownSyntaxName(_))
        ));
    }

    #[test]
    fn turtle_is_parsed_into_store() -> Result<()> {
        let store = parse_str(TURTLE, Syntax::Turtle)?;
        assert_eq!(store.len(), 4);
        assert_eq!(
            store.typed_subjects(iris::OWL_CLASS),
            vec![Node::iri("http://example.org/ont#BloodPressure")]
        );
        assert_eq!(
            store
                .annotation("http://example.org/ont#BloodPressure", AnnotationKind::Description)
                .as_deref(),
            Some("Arterial pressure.")
        );
        Ok(())
    }

    #[test]
    fn ntriples_is_parsed_into_store() -> Result<()> {
        let nt = "<http://example.org/ont#A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n";
        let store = parse_str(nt, Syntax::NTriples)?;
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn malformed_input_is_a_load_error() {
        let err = parse_str("this is not turtle", Syntax::Turtle);
        assert!(matches!(err, Err(Error::Load { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/ontology.ttl");
        let err = load(path, None).err();
        assert!(
            matches!(&err, Some(Error::Load { path: p, .. }) if p == path),
            "unexpected result: {err:?}"
        );
    }

    #[test]
    fn unknown_extension_is_rejected_before_reading() {
        assert!(matches!(
            load(Path::new("/nonexistent/ontology.csv"), None),
            Err(Error::UnknownSyntax { .. })
        ));
    }
}
