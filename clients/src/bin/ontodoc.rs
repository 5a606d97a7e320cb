//! `ontodoc`: Generates documentation from an OWL/RDF ontology file.
//!
//! **Outputs:**
//! - `<out>/<stem>.html`: Self-contained HTML page
//! - `<out>/<stem>.md`: Markdown document
//! - `<out>/<stem>.json`: Machine-readable model with statistics
//! - `<out>/index.html`: Landing page linking the above
//!
//! **Usage:**
//! ```text
//! ontodoc <INPUT> [--out <dir>] [--format html|markdown|json|all]...
//!         [--config <file>] [--syntax rdfxml|turtle|ntriples] [--stem <name>] [-v|-q]
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ontodoc_docs::{write_artifacts, Format, RenderError};
use ontodoc_ontology::{generate, Config, DocumentModel, Syntax};
use tracing_subscriber::EnvFilter;

/// Generate documentation pages from an OWL/RDF ontology.
#[derive(Parser)]
#[command(
    name = "ontodoc",
    version,
    about = "Generate documentation pages from an OWL/RDF ontology"
)]
struct Args {
    /// Ontology file (RDF/XML, Turtle, or N-Triples).
    input: PathBuf,

    /// Output directory for generated documents.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Output format; repeat or comma-separate for several (default: all).
    #[arg(long = "format", value_name = "FORMAT", value_enum, value_delimiter = ',')]
    formats: Vec<FormatArg>,

    /// TOML configuration file (title, namespaces, categories).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input syntax; inferred from the file extension when omitted.
    #[arg(long)]
    syntax: Option<Syntax>,

    /// File name stem for generated documents (default: input file stem).
    #[arg(long)]
    stem: Option<String>,

    /// Log debug detail.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Self-contained HTML page.
    Html,
    /// Markdown document.
    Markdown,
    /// JSON model with statistics.
    Json,
    /// Every format.
    All,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path).map_err(staged)?,
        None => Config::default(),
    };

    let model = generate(&args.input, args.syntax, &config).map_err(staged)?;

    let formats = selected_formats(&args.formats);
    let stem = args.stem.clone().unwrap_or_else(|| stem_of(&args.input));
    let written = write_artifacts(&args.out, &model, &formats, &stem).map_err(|e| {
        let stage = if e.downcast_ref::<RenderError>().is_some() {
            "render"
        } else {
            "write"
        };
        e.context(format!("{stage} failed"))
    })?;

    print_summary(&model);
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

/// Tags a pipeline error with the stage it came from.
fn staged(e: ontodoc_ontology::Error) -> anyhow::Error {
    let stage = e.stage();
    anyhow::Error::new(e).context(format!("{stage} failed"))
}

fn selected_formats(args: &[FormatArg]) -> Vec<Format> {
    if args.is_empty() || args.contains(&FormatArg::All) {
        return Format::ALL.to_vec();
    }
    let mut formats: Vec<Format> = args
        .iter()
        .filter_map(|arg| match arg {
            FormatArg::Html => Some(Format::Html),
            FormatArg::Markdown => Some(Format::Markdown),
            FormatArg::Json => Some(Format::Json),
            FormatArg::All => None,
        })
        .collect();
    formats.sort();
    formats.dedup();
    formats
}

fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "ontology".to_string())
}

fn print_summary(model: &DocumentModel) {
    let stats = model.statistics();
    println!(
        "{}: {} classes in {} categories, {} properties ({} object, {} data) in {} namespaces, {} individuals, {} skipped",
        model.meta.title,
        stats.classes,
        model.populated_categories().count(),
        stats.properties,
        stats.object_properties,
        stats.data_properties,
        model.namespaces.len(),
        stats.individuals,
        stats.skipped,
    );
}
