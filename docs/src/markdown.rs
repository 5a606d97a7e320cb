//! CommonMark rendering.
//!
//! Free text is folded onto one line and backslash-escaped, so labels and
//! descriptions can neither inject inline markup nor open a block (heading,
//! list, thematic break) that would break the document structure.

use std::fmt::Write as _;

use ontodoc_ontology::model::Annotation;
use ontodoc_ontology::{DocumentModel, PropertyEntity};

/// Renders the model as a Markdown document.
#[must_use]
pub fn render(model: &DocumentModel) -> String {
    let meta = &model.meta;
    let stats = model.statistics();
    let mut md = format!("# {}\n\n", escape_markdown(&meta.title));
    if !meta.description.is_empty() {
        let _ = write!(md, "{}\n\n", escape_markdown(&meta.description));
    }

    md.push_str("## Summary\n\n");
    let _ = writeln!(md, "- **Source:** {}", code(&meta.source));
    if let Some(iri) = &meta.ontology_iri {
        let _ = writeln!(md, "- **Ontology IRI:** {}", code(iri));
    }
    if let Some(version) = &meta.version {
        let _ = writeln!(md, "- **Version:** {}", escape_markdown(version));
    }
    md.push_str("\n| Metric | Count |\n|--------|------:|\n");
    for (name, value) in [
        ("Classes", stats.classes),
        ("Properties", stats.properties),
        ("Object properties", stats.object_properties),
        ("Data properties", stats.data_properties),
        ("Named individuals", stats.individuals),
        ("Skipped entities", stats.skipped),
    ] {
        let _ = writeln!(md, "| {name} | {value} |");
    }

    md.push_str("\n### Classes per Category\n\n| Category | Classes |\n|----------|--------:|\n");
    for bucket in &stats.per_category {
        let _ = writeln!(md, "| {} | {} |", escape_markdown(&bucket.name), bucket.count);
    }
    md.push_str("\n### Properties per Namespace\n\n| Namespace | Properties |\n|-----------|-----------:|\n");
    for bucket in &stats.per_namespace {
        let _ = writeln!(md, "| {} | {} |", escape_markdown(&bucket.name), bucket.count);
    }

    md.push_str("\n## Classes\n");
    for bucket in model.populated_categories() {
        let _ = write!(
            md,
            "\n### {} ({})\n",
            escape_markdown(&bucket.name),
            bucket.classes.len()
        );
        for class in &bucket.classes {
            let _ = write!(
                md,
                "\n#### {}\n\n- **IRI:** {}\n",
                escape_markdown(&class.label),
                code(&class.identifier)
            );
            relation_items(
                &mut md,
                &[
                    ("Subclass of", &class.subclass_of),
                    ("Subclasses", &class.subclasses),
                    ("Equivalent to", &class.equivalent_to),
                    ("Disjoint with", &class.disjoint_with),
                ],
            );
            for annotation in &class.annotations {
                let _ = writeln!(md, "- {}", annotation_text(model, annotation));
            }
            if !class.description.is_empty() {
                let _ = write!(md, "\n{}\n", escape_markdown(&class.description));
            }
        }
    }

    md.push_str("\n## Properties\n");
    for bucket in &model.namespaces {
        let _ = write!(
            md,
            "\n### {} ({})\n\n",
            escape_markdown(&bucket.name),
            bucket.properties.len()
        );
        if let Some(iri) = &bucket.iri {
            let _ = write!(md, "Namespace: {}\n\n", code(iri));
        }
        md.push_str("| Name | Kind | IRI | Domain | Range | Description | Details |\n");
        md.push_str("|------|------|-----|--------|-------|-------------|---------|\n");
        for property in &bucket.properties {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} | {} |",
                escape_markdown(&property.label),
                property.kind.as_str(),
                code(&property.identifier),
                code_list(&property.domain),
                code_list(&property.range),
                escape_markdown(&property.description),
                property_details(model, property),
            );
        }
    }

    if !model.individuals.is_empty() {
        md.push_str("\n## Named Individuals\n\n| Name | IRI | Description |\n|------|-----|-------------|\n");
        for individual in &model.individuals {
            let _ = writeln!(
                md,
                "| {} | {} | {} |",
                escape_markdown(&individual.label),
                code(&individual.identifier),
                escape_markdown(&individual.description)
            );
        }
    }

    md.push_str("\n## Vocabularies\n\n| Prefix | IRI |\n|--------|-----|\n");
    for vocabulary in &model.vocabularies {
        let _ = writeln!(
            md,
            "| {} | {} |",
            code(&format!("{}:", vocabulary.prefix)),
            code(&vocabulary.iri)
        );
    }

    if !model.skipped.is_empty() {
        md.push_str("\n## Skipped Entities\n\n| Identifier | Role | Reason |\n|------------|------|--------|\n");
        for entry in &model.skipped {
            let _ = writeln!(
                md,
                "| {} | {} | {} |",
                code(&entry.identifier),
                entry.role,
                entry.reason
            );
        }
    }
    md
}

fn relation_items(md: &mut String, relations: &[(&str, &Vec<String>)]) {
    for (name, targets) in relations {
        if !targets.is_empty() {
            let _ = writeln!(md, "- **{name}:** {}", code_list(targets));
        }
    }
}

/// Secondary relations and annotations of a property, for one table cell.
fn property_details(model: &DocumentModel, property: &PropertyEntity) -> String {
    let relations = [
        ("Subproperty of", &property.subproperty_of),
        ("Subproperties", &property.subproperties),
        ("Equivalent to", &property.equivalent_to),
        ("Inverse of", &property.inverse_of),
    ];
    relations
        .iter()
        .filter(|(_, targets)| !targets.is_empty())
        .map(|(name, targets)| format!("{name}: {}", code_list(targets)))
        .chain(property.annotations.iter().map(|a| annotation_text(model, a)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn annotation_text(model: &DocumentModel, annotation: &Annotation) -> String {
    format!(
        "{}: {}",
        code(&model.compact_iri(&annotation.predicate)),
        escape_markdown(&annotation.value)
    )
}

fn code_list(items: &[String]) -> String {
    items.iter().map(|i| code(i)).collect::<Vec<_>>().join(", ")
}

/// Wraps text in a code span, widening the fence if the text holds backticks.
/// Pipes are escaped so the span is safe inside a table row.
#[must_use]
pub fn code(text: &str) -> String {
    let text = text.replace('|', "\\|");
    if text.contains('`') {
        format!("`` {text} ``")
    } else {
        format!("`{text}`")
    }
}

/// Folds whitespace (newlines included) to single spaces and
/// backslash-escapes CommonMark punctuation, including a leading list,
/// heading-underline, or ordered-list marker.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let folded = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(folded.len() + 8);
    if folded.starts_with(['-', '+', '=']) {
        out.push('\\');
    }
    let digits = folded.chars().take_while(char::is_ascii_digit).count();
    for (i, c) in folded.chars().enumerate() {
        let ordered_marker = i == digits && digits > 0 && matches!(c, '.' | ')');
        if ordered_marker
            || matches!(
                c,
                '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' | '!' | '~' | '&'
            )
        {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn escapes_markup_in_free_text() {
        assert_eq!(escape_markdown("a_b *c* <d>"), r"a\_b \*c\* \<d\>");
    }

    #[test]
    fn free_text_folds_newlines_and_escapes_pipes() {
        assert_eq!(escape_markdown("one\n two | three"), r"one two \| three");
    }

    #[test]
    fn leading_block_markers_are_escaped() {
        assert_eq!(escape_markdown("- one"), r"\- one");
        assert_eq!(escape_markdown("  + two"), r"\+ two");
        assert_eq!(escape_markdown("==="), r"\===");
        assert_eq!(escape_markdown("12. twelve"), r"12\. twelve");
        assert_eq!(escape_markdown("3) three"), r"3\) three");
        assert_eq!(escape_markdown("version 1.2 - final"), "version 1.2 - final");
    }

    #[test]
    fn multi_line_description_stays_one_paragraph() {
        let mut model = fixtures::model();
        model.categories[2].classes[0].description = "Allowed values:\n---\n- one".to_string();
        let md = render(&model);
        assert!(md.contains("\nAllowed values: --- - one\n"));
        assert!(!md.contains("\n---\n"));
        assert!(!md.contains("\n- one"));
    }

    #[test]
    fn code_span_widens_for_backticks() {
        assert_eq!(code("a`b"), "`` a`b ``");
        assert_eq!(code("http://x/y"), "`http://x/y`");
    }

    #[test]
    fn document_structure() {
        let md = render(&fixtures::model());
        assert!(md.starts_with("# CMEO Documentation\n\n## Summary"));
        let order = [
            "## Summary",
            "\n## Classes\n",
            "### Study Design (2)",
            "### Other (1)",
            "\n## Properties\n",
            "### cmeo (1)",
            "### Other/External (1)",
            "## Named Individuals",
            "## Vocabularies",
            "## Skipped Entities",
        ];
        let positions: Vec<usize> = order.iter().filter_map(|h| md.find(h)).collect();
        assert_eq!(positions.len(), order.len());
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!md.contains("### Cohort"));
        assert!(md.contains("| Cohort \\& Population | 0 |"));
    }

    #[test]
    fn class_entries_list_relations_and_descriptions() {
        let md = render(&fixtures::model());
        assert!(md.contains("- **Subclass of:** `https://w3id.org/CMEO/study_design`"));
        assert!(md.contains("Participants are \\<randomly\\> assigned \\& followed."));
    }

    #[test]
    fn property_rows_escape_pipes() {
        let md = render(&fixtures::model());
        assert!(md.contains("| Links \\| anything |"));
    }

    #[test]
    fn reverse_relations_and_annotations_are_rendered() {
        let md = render(&fixtures::model());
        assert!(md.contains("- **Subclasses:** `https://w3id.org/CMEO/randomized_design`"));
        assert!(md.contains("- `skos:altLabel`: RCT design"));
        assert!(md.contains("| Subproperties: `http://unknown.example/vocab#relatedTo` |"));
        assert!(md.contains("| Subproperty of: `https://w3id.org/CMEO/has_value` |"));
    }
}
