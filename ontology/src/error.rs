//! Error types for loading and configuration.

use std::path::PathBuf;

/// Fatal pipeline errors. Per-entity problems are not errors; they are
/// recorded as [`SkippedEntity`](crate::model::SkippedEntity) diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ontology file could not be read or parsed.
    #[error("failed to load ontology {}: {message}", path.display())]
    Load {
        /// Offending file.
        path: PathBuf,
        /// Reader or parser message.
        message: String,
    },

    /// The RDF syntax could not be inferred from the file name.
    #[error(
        "cannot determine the RDF syntax of {}; use a .rdf, .owl, .xml, .ttl or .nt file or pass a syntax explicitly",
        path.display()
    )]
    UnknownSyntax {
        /// Offending file.
        path: PathBuf,
    },

    /// An RDF syntax name was not recognized.
    #[error("unknown RDF syntax `{0}`; expected one of: rdfxml, turtle, ntriples")]
    UnknownSyntaxName(String),

    /// The configuration file could not be read or parsed.
    #[error("failed to read configuration {}: {message}", path.display())]
    Config {
        /// Offending file.
        path: PathBuf,
        /// Reader or parser message.
        message: String,
    },

    /// The configuration is well-formed but inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Pipeline stage the error belongs to, for top-level reporting.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Load { .. } | Error::UnknownSyntax { .. } | Error::UnknownSyntaxName(_) => {
                "load"
            }
            Error::Config { .. } | Error::InvalidConfig(_) => "config",
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
