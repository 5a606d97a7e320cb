//! Landing page linking every generated artifact.
//!
//! The page body is assembled as Markdown and converted with pulldown-cmark,
//! then wrapped in the same shell as the main HTML document.

use pulldown_cmark::{html, Options, Parser};

use ontodoc_ontology::DocumentModel;

use crate::html::render_page;
use crate::markdown::escape_markdown;
use crate::writer::Artifact;

/// File name of the landing page.
pub const INDEX_FILE: &str = "index.html";

/// Renders `index.html` for the given artifacts.
#[must_use]
pub fn render(model: &DocumentModel, artifacts: &[Artifact]) -> String {
    let stats = model.statistics();
    let mut md = String::from("## Generated Documents\n\n");
    for artifact in artifacts {
        md.push_str(&format!(
            "- [{label}]({file}) ({format})\n",
            label = escape_markdown(&artifact.file_name),
            file = artifact.file_name.replace(' ', "%20"),
            format = artifact.format,
        ));
    }
    md.push_str(&format!(
        "\n## At a Glance\n\n| Classes | Properties | Named Individuals | Skipped |\n|--:|--:|--:|--:|\n| {} | {} | {} | {} |\n",
        stats.classes, stats.properties, stats.individuals, stats.skipped
    ));
    md.push_str(&format!(
        "\nGenerated from `{}`.\n",
        model.meta.source.replace('`', "'")
    ));

    render_page(
        &model.meta.title,
        &model.meta.description,
        &markdown_to_html(&md),
    )
}

/// Converts Markdown to HTML using pulldown-cmark.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, opts);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
