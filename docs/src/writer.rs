//! Writes rendered documents to disk.
//!
//! Every requested format is rendered in memory before the first file is
//! touched, so a render failure never leaves partial output behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ontodoc_ontology::DocumentModel;

use crate::{index, render, Format, RenderError};

/// One rendered document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Format the content was rendered in.
    pub format: Format,
    /// File name relative to the output directory.
    pub file_name: String,
    /// Rendered text.
    pub content: String,
}

impl Artifact {
    /// Creates an artifact named `<stem>.<extension>`.
    pub fn new(format: Format, stem: &str, content: String) -> Self {
        Self {
            format,
            file_name: format!("{stem}.{}", format.extension()),
            content,
        }
    }
}

/// Renders each distinct format once, in the order given.
///
/// # Errors
///
/// Returns the first [`RenderError`]; no artifacts are returned in that case.
pub fn render_artifacts(
    model: &DocumentModel,
    formats: &[Format],
    stem: &str,
) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts: Vec<Artifact> = Vec::with_capacity(formats.len());
    for &format in formats {
        if artifacts.iter().any(|a| a.format == format) {
            continue;
        }
        let content = render(model, format)?;
        tracing::debug!(%format, bytes = content.len(), "rendered document");
        artifacts.push(Artifact::new(format, stem, content));
    }
    Ok(artifacts)
}

/// Renders the requested formats and writes them, plus `index.html`, into
/// `out_dir`. Returns the written paths, index last.
///
/// # Errors
///
/// Returns an error wrapping a [`RenderError`] if rendering fails (nothing is
/// written), or an I/O error if a file cannot be written.
pub fn write_artifacts(
    out_dir: &Path,
    model: &DocumentModel,
    formats: &[Format],
    stem: &str,
) -> Result<Vec<PathBuf>> {
    let artifacts = render_artifacts(model, formats, stem)
        .with_context(|| format!("Failed to render documentation for {}", model.meta.source))?;
    let index_html = index::render(model, &artifacts);

    let mut written = Vec::with_capacity(artifacts.len() + 1);
    for artifact in &artifacts {
        let path = out_dir.join(&artifact.file_name);
        write_text(&path, &artifact.content)?;
        written.push(path);
    }
    let index_path = out_dir.join(index::INDEX_FILE);
    write_html(&index_path, &index_html)?;
    written.push(index_path);
    Ok(written)
}

/// Writes an HTML page to the given path, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_html(path: &Path, content: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write HTML: {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote page");
    Ok(())
}

/// Writes a text file (Markdown, JSON, HTML) to the given path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote document");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
