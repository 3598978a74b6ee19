use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use super::catalog::{TemplateCatalog, TemplateSchema};
use crate::config::Settings;
use crate::error::TemplateError;
use crate::process::utils::{is_null_marker, round2};
use crate::schema::is_placeholder;

/// Separates the clauses of an ambiguity message.
pub const AMBIGUITY_DELIMITER: &str = " | ";

/// Outcome of comparing uploaded column names against a template.
/// All three column lists are sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_columns: Vec<String>,
    /// Present in the upload, unknown to the template.
    pub extra_columns: Vec<String>,
    /// Required by the template, absent from the upload.
    pub missing_columns: Vec<String>,
    /// Share of template columns found, 0–100, two decimals.
    pub match_percentage: f64,
    pub total_uploaded_columns: usize,
    pub total_template_columns: usize,
    /// Blank, null-marker or placeholder names dropped before comparing.
    pub invalid_columns: usize,
    pub has_ambiguity: bool,
    pub ambiguity_message: Option<String>,
}

/// A column name that carries no meaning of its own.
fn is_invalid_name(name: &str) -> bool {
    is_null_marker(name) || is_placeholder(name)
}

/// Compare `uploaded` names against `template`, ignoring position.
pub fn match_columns<S: AsRef<str>>(uploaded: &[S], template: &TemplateSchema) -> MatchResult {
    let template_set: BTreeSet<&str> = template.columns.iter().map(String::as_str).collect();

    let (valid, invalid): (Vec<&str>, Vec<&str>) = uploaded
        .iter()
        .map(|name| name.as_ref())
        .partition(|name| !is_invalid_name(name));
    let uploaded_set: BTreeSet<&str> = valid.into_iter().collect();

    // BTreeSet iteration keeps every list sorted
    let matched: Vec<String> = template_set
        .intersection(&uploaded_set)
        .map(|s| s.to_string())
        .collect();
    let extra: Vec<String> = uploaded_set
        .difference(&template_set)
        .map(|s| s.to_string())
        .collect();
    let missing: Vec<String> = template_set
        .difference(&uploaded_set)
        .map(|s| s.to_string())
        .collect();

    let match_percentage = if template_set.is_empty() {
        0.0
    } else {
        round2(matched.len() as f64 * 100.0 / template_set.len() as f64)
    };

    if !extra.is_empty() {
        warn!(?extra, "extra columns not in template {}", template.name);
    }
    if !missing.is_empty() {
        warn!(?missing, "columns missing from template {}", template.name);
    }
    if !invalid.is_empty() {
        warn!("filtered out {} invalid/empty column names", invalid.len());
    }

    let has_ambiguity = !extra.is_empty() || !missing.is_empty();
    let ambiguity_message =
        has_ambiguity.then(|| ambiguity_message(&missing, &extra, invalid.len()));

    info!(
        template = %template.name,
        matched = matched.len(),
        required = template_set.len(),
        match_percentage,
        "column matching complete"
    );

    MatchResult {
        matched_columns: matched,
        extra_columns: extra,
        missing_columns: missing,
        match_percentage,
        total_uploaded_columns: uploaded_set.len(),
        total_template_columns: template_set.len(),
        invalid_columns: invalid.len(),
        has_ambiguity,
        ambiguity_message,
    }
}

fn ambiguity_message(missing: &[String], extra: &[String], invalid: usize) -> String {
    let mut clauses = Vec::new();
    if !missing.is_empty() {
        clauses.push(format!(
            "MISSING COLUMNS ({}): These required columns are missing from your file: {}",
            missing.len(),
            missing.join(", ")
        ));
    }
    if !extra.is_empty() {
        clauses.push(format!(
            "EXTRA COLUMNS ({}): These columns in your file are not in the template: {}",
            extra.len(),
            extra.join(", ")
        ));
    }
    if invalid > 0 {
        clauses.push(format!(
            "INVALID COLUMNS ({}): Filtered out empty or unnamed columns",
            invalid
        ));
    }
    clauses.join(AMBIGUITY_DELIMITER)
}

/// Matches uploads against one template from the catalog.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    template: TemplateSchema,
}

impl ColumnMatcher {
    /// Matcher for `template_name` in the built-in catalog.
    pub fn new(template_name: &str) -> Result<Self, TemplateError> {
        Self::from_catalog(&Settings::builtin().templates, template_name)
    }

    pub fn from_catalog(catalog: &TemplateCatalog, template_name: &str) -> Result<Self, TemplateError> {
        let template = catalog.require(template_name)?;
        info!(template = template_name, "initialized column matcher");
        Ok(Self { template })
    }

    pub fn template(&self) -> &TemplateSchema {
        &self.template
    }

    pub fn template_columns(&self) -> &[String] {
        &self.template.columns
    }

    pub fn match_columns<S: AsRef<str>>(&self, uploaded: &[S]) -> MatchResult {
        match_columns(uploaded, &self.template)
    }
}
