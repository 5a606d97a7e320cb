//! Machine-readable JSON rendering.

use serde::Serialize;

use ontodoc_ontology::model::{
    CategoryBucket, DocumentMeta, Individual, NamespaceBucket, SkippedEntity, Statistics,
    Vocabulary,
};
use ontodoc_ontology::DocumentModel;

use crate::RenderError;

/// Top-level JSON document. Statistics are included so consumers need not
/// recount the buckets.
#[derive(Serialize)]
struct JsonDocument<'a> {
    meta: &'a DocumentMeta,
    statistics: Statistics,
    categories: &'a [CategoryBucket],
    namespaces: &'a [NamespaceBucket],
    individuals: &'a [Individual],
    vocabularies: &'a [Vocabulary],
    skipped: &'a [SkippedEntity],
}

/// Renders the model as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] if serialization fails.
pub fn render(model: &DocumentModel) -> Result<String, RenderError> {
    let document = JsonDocument {
        meta: &model.meta,
        statistics: model.statistics(),
        categories: &model.categories,
        namespaces: &model.namespaces,
        individuals: &model.individuals,
        vocabularies: &model.vocabularies,
        skipped: &model.skipped,
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}
