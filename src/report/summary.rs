use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::alias::{FieldAliases, LogicalField};
use super::Record;
use crate::process::utils::round2;

/// Coverage figures for a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_records: usize,
    /// Distinct sections in first-seen order.
    pub sections: Vec<String>,
    pub section_counts: BTreeMap<String, usize>,
    pub filled_current: usize,
    pub filled_target: usize,
    pub completion_rate_current: f64,
    pub completion_rate_target: f64,
}

pub fn summarize(records: &[Record], aliases: &FieldAliases) -> DataSummary {
    let mut summary = DataSummary {
        total_records: records.len(),
        ..DataSummary::default()
    };

    for rec in records {
        if let Some(section) = aliases.lookup(rec, LogicalField::Section) {
            let count = summary.section_counts.entry(section.to_string()).or_insert(0);
            if *count == 0 {
                summary.sections.push(section.to_string());
            }
            *count += 1;
        }
        if aliases.lookup(rec, LogicalField::Current).is_some() {
            summary.filled_current += 1;
        }
        if aliases.lookup(rec, LogicalField::Target).is_some() {
            summary.filled_target += 1;
        }
    }

    if summary.total_records > 0 {
        let total = summary.total_records as f64;
        summary.completion_rate_current = round2(summary.filled_current as f64 * 100.0 / total);
        summary.completion_rate_target = round2(summary.filled_target as f64 * 100.0 / total);
    }
    summary
}

const RULE_WIDTH: usize = 80;

/// Plain-text digest of `records`, grouped by section, for the report writer.
pub fn format_for_report(records: &[Record], aliases: &FieldAliases) -> String {
    if records.is_empty() {
        return "No data available.".to_string();
    }

    let mut lines = vec![
        "ESG DATA SUMMARY".to_string(),
        "=".repeat(RULE_WIDTH),
        String::new(),
    ];
    let mut current_section: Option<&str> = None;

    for rec in records {
        if let Some(section) = aliases.lookup(rec, LogicalField::Section) {
            if current_section != Some(section) {
                current_section = Some(section);
                lines.push(format!("\n## {}", section));
                lines.push("-".repeat(RULE_WIDTH));
            }
        }

        let Some(field) = aliases.lookup(rec, LogicalField::Field) else {
            continue;
        };
        lines.push(format!("\n### {}", field));

        for (label, which) in [
            ("Previous Year", LogicalField::PrevYear),
            ("Current", LogicalField::Current),
            ("Target", LogicalField::Target),
            ("Unit", LogicalField::Unit),
            ("Notes", LogicalField::Notes),
        ] {
            if let Some(value) = aliases.lookup(rec, which) {
                lines.push(format!("  {}: {}", label, value));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn records() -> Vec<Record> {
        vec![
            vec![
                ("Section / القسم", "Environment"),
                ("Field (EN)", "Scope 1 emissions"),
                ("Prev Year", "1200"),
                ("Current", "1100"),
                ("Target", "1000"),
                ("Unit", "tCO2e"),
            ],
            vec![
                ("Section / القسم", "Environment"),
                ("Field (EN)", "Water use"),
                ("Current", "nan"),
                ("Notes", "metering pending"),
            ],
            vec![
                ("Section / القسم", "Social"),
                ("Field (EN)", "Employee turnover"),
                ("Current", "12"),
            ],
        ]
        .into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect()
    }

    #[test]
    fn summary_counts_sections_and_fill_rates() {
        let s = summarize(&records(), &Settings::builtin().aliases);
        assert_eq!(s.total_records, 3);
        assert_eq!(s.sections, vec!["Environment", "Social"]);
        assert_eq!(s.section_counts["Environment"], 2);
        assert_eq!(s.filled_current, 2);
        assert_eq!(s.filled_target, 1);
        assert_eq!(s.completion_rate_current, 66.67);
        assert_eq!(s.completion_rate_target, 33.33);
    }

    #[test]
    fn empty_summary_has_zero_rates() {
        let s = summarize(&[], &Settings::builtin().aliases);
        assert_eq!(s, DataSummary::default());
    }

    #[test]
    fn report_text_groups_by_section() {
        let text = format_for_report(&records(), &Settings::builtin().aliases);
        assert!(text.starts_with("ESG DATA SUMMARY\n"));
        assert_eq!(text.matches("## Environment").count(), 1);
        assert!(text.contains("### Scope 1 emissions\n  Previous Year: 1200\n  Current: 1100"));
        assert!(text.contains("  Unit: tCO2e"));
        assert!(text.contains("### Water use\n  Notes: metering pending"));
        assert!(!text.contains("nan"));
    }

    #[test]
    fn empty_report_text() {
        assert_eq!(
            format_for_report(&[], &Settings::builtin().aliases),
            "No data available."
        );
    }
}
