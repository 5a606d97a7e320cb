//! Assigns every class to exactly one presentation category.
//!
//! Rules are evaluated top to bottom and the first rule with a keyword that
//! occurs (case-insensitively) in the class identifier or label wins. A class
//! that matches nothing lands in the default category, so categorization
//! never fails.
//!
//! Before matching, text and keywords are folded: letters are lower-cased and
//! every run of non-alphanumeric characters becomes one space, so `date_of`,
//! `date-of`, and `Date Of` all read `date of`. The text is padded with a space
//! on each side; a keyword written with surrounding spaces (`" age "`) therefore
//! matches whole words only and never the inside of `Average` or `Image`.

use serde::{Deserialize, Serialize};

use crate::model::{CategoryBucket, ClassEntity};

/// Name of the overflow category used when no rule matches.
pub const DEFAULT_CATEGORY: &str = "Other";

/// One named category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    /// Category name as shown in documents.
    pub name: String,
    /// Substrings matched against the folded identifier and label. Leading or
    /// trailing spaces anchor the keyword at a word boundary.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Creates a rule from a name and keyword list.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reference category table for clinical metadata ontologies. Order is
/// priority: earlier entries shadow later ones.
const REFERENCE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Study Design",
        &[
            "design", " trial", "randomized", "randomised", "crossover", "cross over",
            "protocol", "study arm",
        ],
    ),
    ("Study & Investigation", &["study", "investigation", "project"]),
    (
        "Cohort & Population",
        &[
            "cohort", "population", "participant", "eligibility", "inclusion", "exclusion",
            "enrollment", "enrolment",
        ],
    ),
    (
        "Statistics",
        &[
            "statistic", " mean ", "average", "median", "deviation", "variance", "percentile",
            "quartile", "distribution", "frequency",
        ],
    ),
    (
        "Variables",
        &["variable", "categorical", "continuous", "binary", "multi class"],
    ),
    (
        "Measurement",
        &["measurement", "measure", "unit of", "ucum", " scale", "quantity"],
    ),
    (
        "Data Standards",
        &["standard", "omop", "snomed", "loinc", "rxnorm", " icd", "terminology"],
    ),
    ("Concepts & Codes", &["concept", " code ", " codes ", "coding", "mapping"]),
    (
        "Drugs & Treatments",
        &[
            "drug", "medication", "treatment", "therapy", "dosage", " dose", "intervention",
            "prescription",
        ],
    ),
    (
        "Demographics",
        &["demographic", " age ", " sex ", "gender", "ethnicity", " race ", "birth"],
    ),
    (
        "Clinical Findings",
        &["diagnos", "condition", "disease", "disorder", "finding", "symptom", "adverse"],
    ),
    ("Procedures", &["procedure", "surgery", "surgical", " operation"]),
    (
        "Laboratory",
        &["laboratory", "lab test", "assay", "specimen", "sample", "biomarker"],
    ),
    (
        "Visits & Encounters",
        &["visit", "encounter", "admission", "hospitali", "episode"],
    ),
    ("Observations & Events", &["observation", " event", "occurrence"]),
    (
        "Temporal",
        &[
            " time", "date of", " date ", "duration", "period", "follow up", "baseline",
        ],
    ),
    (
        "Datasets & Records",
        &[
            "dataset", "data set", "data element", "record", "database", "data table",
            "column", "field", "metadata",
        ],
    ),
    (
        "Documents & Identifiers",
        &["document", "information content", "identifier", "publication", " textual"],
    ),
    (
        "Organizations & Roles",
        &[
            "organization", "organisation", "institution", " role", "investigator", "sponsor",
            "person", "study site",
        ],
    ),
];

/// The reference rule table as owned values.
#[must_use]
pub fn reference_rules() -> Vec<CategoryRule> {
    REFERENCE_CATEGORIES
        .iter()
        .map(|(name, keywords)| CategoryRule::new(*name, keywords.iter().copied()))
        .collect()
}

/// Ordered first-match categorizer.
#[derive(Debug, Clone)]
pub struct Categorizer {
    /// Rules with keywords folded once up front.
    rules: Vec<CategoryRule>,
    default: String,
}

impl Categorizer {
    /// Builds a categorizer from an ordered rule list and a default category.
    pub fn new(rules: Vec<CategoryRule>, default: impl Into<String>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| fold(k))
                    .filter(|k| !k.trim().is_empty())
                    .collect(),
                name: rule.name,
            })
            .collect();
        Self {
            rules,
            default: default.into(),
        }
    }

    /// The reference clinical-metadata categorizer.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(reference_rules(), DEFAULT_CATEGORY)
    }

    /// Returns the category for a class.
    #[must_use]
    pub fn categorize(&self, class: &ClassEntity) -> &str {
        self.categorize_text(&class.identifier, &class.label)
    }

    /// Returns the category for an `(identifier, label)` pair.
    #[must_use]
    pub fn categorize_text(&self, identifier: &str, label: &str) -> &str {
        self.matching_rule(identifier, label)
            .map_or(self.default.as_str(), |i| self.rules[i].name.as_str())
    }

    /// Index of the first rule matching the pair, if any.
    fn matching_rule(&self, identifier: &str, label: &str) -> Option<usize> {
        let identifier = format!(" {} ", fold(identifier));
        let label = format!(" {} ", fold(label));
        self.rules.iter().position(|rule| {
            rule.keywords
                .iter()
                .any(|k| identifier.contains(k.as_str()) || label.contains(k.as_str()))
        })
    }

    /// All category names in bucket order (rules, then the default).
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|r| r.name.as_str())
            .chain(std::iter::once(self.default.as_str()))
    }

    /// Distributes classes into one bucket per category, keeping input order
    /// within each bucket. Every category gets a bucket, even if empty.
    #[must_use]
    pub fn bucket(&self, classes: Vec<ClassEntity>) -> Vec<CategoryBucket> {
        let mut buckets: Vec<CategoryBucket> = self
            .category_names()
            .map(|name| CategoryBucket {
                name: name.to_string(),
                classes: Vec::new(),
            })
            .collect();
        let default_index = buckets.len() - 1;

        for class in classes {
            let index = self
                .matching_rule(&class.identifier, &class.label)
                .unwrap_or(default_index);
            buckets[index].classes.push(class);
        }
        buckets
    }
}

/// Lower-cases `text` and turns every run of non-alphanumeric characters into
/// a single space.
fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            folded.extend(c.to_lowercase());
            in_gap = false;
        } else if !in_gap {
            folded.push(' ');
            in_gap = true;
        }
    }
    folded
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::reference()
    }
}
