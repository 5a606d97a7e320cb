//! Self-contained HTML page with the stylesheet embedded.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use ontodoc_ontology::model::{Annotation, Statistics};
use ontodoc_ontology::{ClassEntity, DocumentModel, NamespaceBucket, PropertyEntity};

/// Stylesheet embedded in every generated page.
pub const STYLESHEET: &str = include_str!("../static/css/style.css");

/// Renders the full documentation page.
#[must_use]
pub fn render(model: &DocumentModel) -> String {
    let stats = model.statistics();
    let anchors = Anchors::new(model);

    let mut content = String::new();
    content.push_str(&summary_section(model, &stats, &anchors));
    content.push_str(&classes_section(model, &anchors));
    content.push_str(&properties_section(model, &anchors));
    content.push_str(&individuals_section(model, &anchors));
    content.push_str(&vocabularies_section(model));
    content.push_str(&skipped_section(model));

    render_page(&model.meta.title, &model.meta.description, &content)
}

/// Element ids for every category, namespace, and entity on the page.
///
/// Ids start from [`anchor`]; a later element whose id is already taken gets
/// `-2`, `-3`, ... appended, so ids stay unique even when distinct IRIs slug
/// to the same text.
struct Anchors<'a> {
    categories: HashMap<&'a str, String>,
    namespaces: HashMap<&'a str, String>,
    classes: HashMap<&'a str, String>,
    properties: HashMap<&'a str, String>,
    individuals: HashMap<&'a str, String>,
}

impl<'a> Anchors<'a> {
    fn new(model: &'a DocumentModel) -> Self {
        let mut taken = HashSet::new();
        let mut assign = |prefix: &str, keys: Vec<&'a str>| -> HashMap<&'a str, String> {
            keys.into_iter()
                .map(|key| (key, unique_id(&mut taken, anchor(prefix, key))))
                .collect()
        };
        Self {
            categories: assign(
                "category",
                model.categories.iter().map(|b| b.name.as_str()).collect(),
            ),
            namespaces: assign(
                "namespace",
                model.namespaces.iter().map(|b| b.name.as_str()).collect(),
            ),
            classes: assign("class", model.classes().map(|c| c.identifier.as_str()).collect()),
            properties: assign(
                "property",
                model.properties().map(|p| p.identifier.as_str()).collect(),
            ),
            individuals: assign(
                "individual",
                model.individuals.iter().map(|i| i.identifier.as_str()).collect(),
            ),
        }
    }

    fn category(&self, name: &str) -> String {
        lookup(&self.categories, "category", name)
    }

    fn namespace(&self, name: &str) -> String {
        lookup(&self.namespaces, "namespace", name)
    }

    fn class(&self, iri: &str) -> String {
        lookup(&self.classes, "class", iri)
    }

    fn property(&self, iri: &str) -> String {
        lookup(&self.properties, "property", iri)
    }

    fn individual(&self, iri: &str) -> String {
        lookup(&self.individuals, "individual", iri)
    }

    /// The row a relation target links to: a documented class, then a
    /// documented property.
    fn target(&self, iri: &str) -> Option<&str> {
        self.classes
            .get(iri)
            .or_else(|| self.properties.get(iri))
            .map(String::as_str)
    }
}

fn lookup(ids: &HashMap<&str, String>, prefix: &str, key: &str) -> String {
    ids.get(key).cloned().unwrap_or_else(|| anchor(prefix, key))
}

fn unique_id(taken: &mut HashSet<String>, base: String) -> String {
    let mut id = base.clone();
    let mut n = 1;
    while !taken.insert(id.clone()) {
        n += 1;
        id = format!("{base}-{n}");
    }
    id
}

/// Wraps `content_html` in the standard page shell.
///
/// `title` and `description` are escaped here; `content_html` is inserted
/// verbatim.
#[must_use]
pub fn render_page(title: &str, description: &str, content_html: &str) -> String {
    let intro = if description.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>\n", escape_html(description))
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{STYLESHEET}</style>
</head>
<body>
<header class="site-header">
<h1>{title}</h1>
{intro}</header>
<main id="main-content">
{content_html}</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn summary_section(model: &DocumentModel, stats: &Statistics, anchors: &Anchors) -> String {
    let meta = &model.meta;
    let mut html = String::from("<section id=\"summary\">\n<h2>Summary</h2>\n<dl class=\"meta\">\n");
    let _ = writeln!(
        html,
        "<dt>Source</dt><dd><code>{}</code></dd>",
        escape_html(&meta.source)
    );
    if let Some(iri) = &meta.ontology_iri {
        let _ = writeln!(
            html,
            "<dt>Ontology IRI</dt><dd><code>{}</code></dd>",
            escape_html(iri)
        );
    }
    if let Some(version) = &meta.version {
        let _ = writeln!(html, "<dt>Version</dt><dd>{}</dd>", escape_html(version));
    }
    html.push_str("</dl>\n<div class=\"stats\">\n");
    for (name, value) in [
        ("Classes", stats.classes),
        ("Properties", stats.properties),
        ("Object Properties", stats.object_properties),
        ("Data Properties", stats.data_properties),
        ("Named Individuals", stats.individuals),
        ("Skipped", stats.skipped),
    ] {
        let _ = writeln!(
            html,
            "<div class=\"stat\"><span class=\"value\">{value}</span><span class=\"name\">{name}</span></div>"
        );
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Classes per Category</h3>\n<table>\n<thead><tr><th>Category</th><th>Classes</th></tr></thead>\n<tbody>\n");
    for bucket in &stats.per_category {
        let name = if bucket.count > 0 {
            format!(
                "<a href=\"#{}\">{}</a>",
                anchors.category(&bucket.name),
                escape_html(&bucket.name)
            )
        } else {
            escape_html(&bucket.name)
        };
        let _ = writeln!(html, "<tr><td>{name}</td><td>{}</td></tr>", bucket.count);
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str("<h3>Properties per Namespace</h3>\n<table>\n<thead><tr><th>Namespace</th><th>Properties</th></tr></thead>\n<tbody>\n");
    for bucket in &stats.per_namespace {
        let _ = writeln!(
            html,
            "<tr><td><a href=\"#{}\">{}</a></td><td>{}</td></tr>",
            anchors.namespace(&bucket.name),
            escape_html(&bucket.name),
            bucket.count
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

fn classes_section(model: &DocumentModel, anchors: &Anchors) -> String {
    let mut html = String::from("<section id=\"classes\">\n<h2>Classes</h2>\n");
    let mut any = false;
    for bucket in model.populated_categories() {
        any = true;
        let _ = writeln!(
            html,
            "<h3 id=\"{}\">{} <span class=\"badge\">{}</span></h3>",
            anchors.category(&bucket.name),
            escape_html(&bucket.name),
            bucket.classes.len()
        );
        html.push_str("<table>\n<thead><tr><th>Name</th><th>IRI</th><th>Description</th><th>Relations</th></tr></thead>\n<tbody>\n");
        for class in &bucket.classes {
            let _ = writeln!(
                html,
                "<tr id=\"{id}\"><td>{label}</td><td><code>{iri}</code></td><td>{description}</td><td>{relations}</td></tr>",
                id = anchors.class(&class.identifier),
                label = escape_html(&class.label),
                iri = escape_html(&class.identifier),
                description = description_cell(model, &class.description, &class.annotations),
                relations = class_relations(class, anchors),
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }
    if !any {
        html.push_str("<p class=\"empty\">No classes declared.</p>\n");
    }
    html.push_str("</section>\n");
    html
}

fn class_relations(class: &ClassEntity, anchors: &Anchors) -> String {
    relation_list(
        &[
            ("Subclass of", &class.subclass_of),
            ("Subclasses", &class.subclasses),
            ("Equivalent to", &class.equivalent_to),
            ("Disjoint with", &class.disjoint_with),
        ],
        anchors,
    )
}

fn properties_section(model: &DocumentModel, anchors: &Anchors) -> String {
    let mut html = String::from("<section id=\"properties\">\n<h2>Properties</h2>\n");
    if model.namespaces.is_empty() {
        html.push_str("<p class=\"empty\">No properties declared.</p>\n");
    }
    for bucket in &model.namespaces {
        html.push_str(&namespace_block(model, bucket, anchors));
    }
    html.push_str("</section>\n");
    html
}

fn namespace_block(model: &DocumentModel, bucket: &NamespaceBucket, anchors: &Anchors) -> String {
    let mut html = format!(
        "<h3 id=\"{}\">{} <span class=\"badge\">{}</span></h3>\n",
        anchors.namespace(&bucket.name),
        escape_html(&bucket.name),
        bucket.properties.len()
    );
    if let Some(iri) = &bucket.iri {
        let _ = writeln!(html, "<p><code>{}</code></p>", escape_html(iri));
    }
    html.push_str("<table>\n<thead><tr><th>Name</th><th>Kind</th><th>IRI</th><th>Description</th><th>Relations</th></tr></thead>\n<tbody>\n");
    for property in &bucket.properties {
        let _ = writeln!(
            html,
            "<tr id=\"{id}\"><td>{label}</td><td>{kind}</td><td><code>{iri}</code></td><td>{description}</td><td>{relations}</td></tr>",
            id = anchors.property(&property.identifier),
            label = escape_html(&property.label),
            kind = property.kind.as_str(),
            iri = escape_html(&property.identifier),
            description = description_cell(model, &property.description, &property.annotations),
            relations = property_relations(property, anchors),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn property_relations(property: &PropertyEntity, anchors: &Anchors) -> String {
    relation_list(
        &[
            ("Domain", &property.domain),
            ("Range", &property.range),
            ("Subproperty of", &property.subproperty_of),
            ("Subproperties", &property.subproperties),
            ("Equivalent to", &property.equivalent_to),
            ("Inverse of", &property.inverse_of),
        ],
        anchors,
    )
}

/// Description text followed by any extra annotations.
fn description_cell(model: &DocumentModel, description: &str, annotations: &[Annotation]) -> String {
    let mut html = escape_html(description);
    if annotations.is_empty() {
        return html;
    }
    html.push_str("<dl class=\"annotations\">");
    for annotation in annotations {
        let _ = write!(
            html,
            "<dt><code title=\"{}\">{}</code></dt><dd>{}</dd>",
            escape_html(&annotation.predicate),
            escape_html(&model.compact_iri(&annotation.predicate)),
            escape_html(&annotation.value)
        );
    }
    html.push_str("</dl>");
    html
}

/// Renders non-empty relation lists; targets documented on the page link to
/// their row.
fn relation_list(relations: &[(&str, &Vec<String>)], anchors: &Anchors) -> String {
    let mut html = String::new();
    for (name, targets) in relations {
        if targets.is_empty() {
            continue;
        }
        let links: Vec<String> = targets
            .iter()
            .map(|iri| match anchors.target(iri) {
                Some(id) => format!(
                    "<a href=\"#{id}\"><code>{}</code></a>",
                    escape_html(iri)
                ),
                None => format!("<code>{}</code>", escape_html(iri)),
            })
            .collect();
        let _ = write!(html, "<div>{name}: {}</div>", links.join(", "));
    }
    html
}

fn individuals_section(model: &DocumentModel, anchors: &Anchors) -> String {
    let mut html = String::from("<section id=\"individuals\">\n<h2>Named Individuals</h2>\n");
    if model.individuals.is_empty() {
        html.push_str("<p class=\"empty\">No named individuals declared.</p>\n</section>\n");
        return html;
    }
    html.push_str("<table>\n<thead><tr><th>Name</th><th>IRI</th><th>Description</th></tr></thead>\n<tbody>\n");
    for individual in &model.individuals {
        let _ = writeln!(
            html,
            "<tr id=\"{}\"><td>{}</td><td><code>{}</code></td><td>{}</td></tr>",
            anchors.individual(&individual.identifier),
            escape_html(&individual.label),
            escape_html(&individual.identifier),
            escape_html(&individual.description),
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

fn vocabularies_section(model: &DocumentModel) -> String {
    let mut html = String::from("<section id=\"vocabularies\">\n<h2>Vocabularies</h2>\n<table>\n<thead><tr><th>Prefix</th><th>IRI</th></tr></thead>\n<tbody>\n");
    for vocabulary in &model.vocabularies {
        let _ = writeln!(
            html,
            "<tr><td><code>{}:</code></td><td><code>{}</code></td></tr>",
            escape_html(&vocabulary.prefix),
            escape_html(&vocabulary.iri)
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

fn skipped_section(model: &DocumentModel) -> String {
    if model.skipped.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section id=\"skipped\">\n<h2>Skipped Entities</h2>\n<table>\n<thead><tr><th>Identifier</th><th>Role</th><th>Reason</th></tr></thead>\n<tbody>\n");
    for entry in &model.skipped {
        let _ = writeln!(
            html,
            "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.identifier),
            entry.role,
            entry.reason
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

/// Builds an element id from a prefix and arbitrary text.
///
/// ASCII alphanumerics are kept (lower-cased); every other run of characters
/// collapses to a single `-`.
#[must_use]
pub fn anchor(prefix: &str, text: &str) -> String {
    let mut id = String::with_capacity(prefix.len() + text.len() + 1);
    id.push_str(prefix);
    let mut pending_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash {
                id.push('-');
                pending_dash = false;
            }
            id.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    id
}

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn anchors_are_stable_ids() {
        assert_eq!(anchor("category", "Cohort & Population"), "category-cohort-population");
        assert_eq!(
            anchor("class", "https://w3id.org/CMEO/study_design"),
            "class-https-w3id-org-cmeo-study-design"
        );
    }

    #[test]
    fn page_embeds_stylesheet() {
        let html = render(&fixtures::model());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains(".site-header"));
        assert!(!html.contains("<link rel=\"stylesheet\""));
    }

    #[test]
    fn descriptions_are_escaped() {
        let html = render(&fixtures::model());
        assert!(html.contains("Participants are &lt;randomly&gt; assigned &amp; followed."));
        assert!(!html.contains("<randomly>"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let html = render(&fixtures::model());
        let positions: Vec<Option<usize>> = [
            "id=\"summary\"",
            "id=\"classes\"",
            "id=\"properties\"",
            "id=\"individuals\"",
            "id=\"vocabularies\"",
            "id=\"skipped\"",
        ]
        .iter()
        .map(|marker| html.find(marker))
        .collect();
        assert!(positions.iter().all(Option::is_some), "{positions:?}");
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn only_populated_categories_get_sections() {
        let html = render(&fixtures::model());
        assert!(html.contains("<h3 id=\"category-study-design\">"));
        assert!(!html.contains("<h3 id=\"category-cohort-population\">"));
        // Still listed in the summary.
        assert!(html.contains("<tr><td>Cohort &amp; Population</td><td>0</td></tr>"));
    }

    #[test]
    fn known_relation_targets_link_to_rows() {
        let html = render(&fixtures::model());
        assert!(html.contains(
            "Subclass of: <a href=\"#class-https-w3id-org-cmeo-study-design\">"
        ));
    }

    #[test]
    fn empty_description_renders_empty_cell() {
        let html = render(&fixtures::model());
        assert!(html.contains("<td><code>https://w3id.org/CMEO/study_design</code></td><td></td>"));
    }

    #[test]
    fn colliding_slugs_get_distinct_ids() {
        let mut model = fixtures::model();
        model.categories[2].classes = vec![
            ClassEntity::new("https://w3id.org/CMEO/blood_pressure", "Blood Pressure", ""),
            ClassEntity::new("https://w3id.org/CMEO/blood-pressure", "Blood-Pressure", ""),
            ClassEntity::new("https://w3id.org/CMEO/Blood_Pressure", "Blood Pressure (upper)", ""),
        ];
        model.categories[0].classes[1].subclass_of =
            vec!["https://w3id.org/CMEO/blood-pressure".to_string()];
        let html = render(&model);

        let base = "class-https-w3id-org-cmeo-blood-pressure";
        for id in [base.to_string(), format!("{base}-2"), format!("{base}-3")] {
            assert_eq!(html.matches(&format!("id=\"{id}\"")).count(), 1, "{id}");
        }
        assert!(html.contains(&format!("Subclass of: <a href=\"#{base}-2\">")));
    }

    #[test]
    fn property_relation_targets_link_to_property_rows() {
        let html = render(&fixtures::model());
        assert!(html.contains(
            "Subproperty of: <a href=\"#property-https-w3id-org-cmeo-has-value\">"
        ));
        assert!(html.contains(
            "Subproperties: <a href=\"#property-http-unknown-example-vocab-relatedto\">"
        ));
        assert!(html.contains(
            "Domain: <a href=\"#class-https-w3id-org-cmeo-bloodpressure\">"
        ));
    }

    #[test]
    fn subclasses_and_annotations_are_listed() {
        let html = render(&fixtures::model());
        assert!(html.contains(
            "Subclasses: <a href=\"#class-https-w3id-org-cmeo-randomized-design\">"
        ));
        assert!(html.contains(&format!(
            "<dt><code title=\"{}\">skos:altLabel</code></dt><dd>RCT design</dd>",
            fixtures::ALT_LABEL
        )));
    }
}
