//! Chart specifications derived from the data. Only the data side lives here;
//! drawing is the renderer's job.

use serde::{Deserialize, Serialize};

use super::alias::{FieldAliases, LogicalField};
use super::Record;
use crate::process::utils::{is_null_marker, parse_number};

/// Trend charts beyond this many clutter the report.
pub const MAX_TREND_CHARTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub category: String,
    pub title: String,
    /// (label, value) pairs in first-seen order.
    pub data: Vec<(String, f64)>,
    pub ylabel: Option<String>,
    pub field_name: Option<String>,
}

/// One keyword-driven chart: fields whose label mentions any keyword feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCategory {
    pub name: String,
    pub kind: ChartKind,
    pub title: String,
    #[serde(default)]
    pub ylabel: Option<String>,
    pub keywords: Vec<String>,
}

/// Placeholder strings exporters use for "no value", on top of the null markers.
const MISSING_VALUES: [&str; 2] = ["not available", "n/a"];

/// A strictly positive number, or `None` for blanks, placeholders and text.
fn positive_value(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if is_null_marker(raw) || MISSING_VALUES.iter().any(|m| raw.eq_ignore_ascii_case(m)) {
        return None;
    }
    parse_number(raw).filter(|v| *v > 0.0)
}

fn upsert(data: &mut Vec<(String, f64)>, label: &str, value: f64) {
    match data.iter_mut().find(|(l, _)| l == label) {
        Some((_, v)) => *v = value,
        None => data.push((label.to_string(), value)),
    }
}

/// Current values of every field whose label mentions one of `keywords`.
fn keyword_series(records: &[Record], aliases: &FieldAliases, keywords: &[String]) -> Vec<(String, f64)> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut data = Vec::new();
    for rec in records {
        let Some(label) = aliases.lookup(rec, LogicalField::Field) else {
            continue;
        };
        let lower = label.to_lowercase();
        if !keywords.iter().any(|k| lower.contains(k.as_str())) {
            continue;
        }
        if let Some(v) = positive_value(aliases.lookup(rec, LogicalField::Current)) {
            upsert(&mut data, label, v);
        }
    }
    data
}

/// Previous / current / target lines for fields with two or more usable
/// values, first `MAX_TREND_CHARTS` only.
fn trend_specs(records: &[Record], aliases: &FieldAliases) -> Vec<ChartSpec> {
    records
        .iter()
        .filter_map(|rec| {
            let field = aliases.lookup(rec, LogicalField::Field)?;
            let data: Vec<(String, f64)> = [
                ("Previous Year", LogicalField::PrevYear),
                ("Current", LogicalField::Current),
                ("Target", LogicalField::Target),
            ]
            .into_iter()
            .filter_map(|(period, which)| {
                positive_value(aliases.lookup(rec, which)).map(|v| (period.to_string(), v))
            })
            .collect();

            (data.len() >= 2).then(|| ChartSpec {
                kind: ChartKind::Line,
                category: "trend".to_string(),
                title: format!("{} - Trend", field),
                data,
                ylabel: Some("Value".to_string()),
                field_name: Some(field.to_string()),
            })
        })
        .take(MAX_TREND_CHARTS)
        .collect()
}

/// Every chart the data can support: one per keyword category with at least
/// two data points, then up to `MAX_TREND_CHARTS` trend lines.
pub fn analyze_for_charts(
    records: &[Record],
    aliases: &FieldAliases,
    categories: &[ChartCategory],
) -> Vec<ChartSpec> {
    let mut specs: Vec<ChartSpec> = categories
        .iter()
        .filter_map(|cat| {
            let data = keyword_series(records, aliases, &cat.keywords);
            (data.len() >= 2).then(|| ChartSpec {
                kind: cat.kind,
                category: cat.name.clone(),
                title: cat.title.clone(),
                data,
                ylabel: cat.ylabel.clone(),
                field_name: None,
            })
        })
        .collect();
    specs.extend(trend_specs(records, aliases));
    specs
}
