// src/pipeline.rs

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::config::Settings;
use crate::process::{load_table, MalformedRowReport, Table};
use crate::report::{
    analyze_for_charts, summarize, ChangeRecord, ChangeTally, ChartSpec, DataSummary,
    TrendClassifier,
};
use crate::template::{ColumnMatcher, MatchResult};

/// Everything learned about one uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub template: String,
    pub columns: Vec<String>,
    pub match_result: MatchResult,
    pub malformed: MalformedRowReport,
    pub tally: ChangeTally,
    pub summary: DataSummary,
    pub charts: Vec<ChartSpec>,
    pub changes: Vec<ChangeRecord>,
}

/// Load `path`, match it against `template` and classify every row.
///
/// The template is resolved before the file is read, so an unknown template
/// fails without touching the disk.
#[tracing::instrument(level = "info", skip(path, settings), fields(path = %path.as_ref().display()))]
pub fn reconcile_file<P: AsRef<Path>>(
    path: P,
    template: &str,
    settings: &Settings,
) -> Result<FileReport> {
    let path = path.as_ref();
    let matcher = ColumnMatcher::from_catalog(&settings.templates, template)?;

    let (table, malformed) = load_table(path, &settings.ingest)
        .with_context(|| format!("loading {}", path.display()))?;

    Ok(reconcile_table(
        path.display().to_string(),
        &matcher,
        table,
        malformed,
        settings,
    ))
}

/// Match, classify and summarise an already-built table.
pub fn reconcile_table(
    file: String,
    matcher: &ColumnMatcher,
    table: Table,
    malformed: MalformedRowReport,
    settings: &Settings,
) -> FileReport {
    // 1) schema match on the header row
    let match_result = matcher.match_columns(&table.headers);

    // 2) per-row records, summary and charts
    let records = table.records();
    let summary = summarize(&records, &settings.aliases);
    let charts = analyze_for_charts(&records, &settings.aliases, &settings.charts);

    // 3) trend classification
    let changes = TrendClassifier::from_settings(settings).classify_all(records);
    let tally = ChangeTally::from_records(&changes);

    info!(
        file = %file,
        rows = table.len(),
        malformed = malformed.len(),
        match_percentage = match_result.match_percentage,
        improved = tally.improved,
        worsened = tally.worsened,
        "reconciled file"
    );

    FileReport {
        file,
        template: matcher.template().name.clone(),
        columns: table.headers,
        match_result,
        malformed,
        tally,
        summary,
        charts,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IngestError, TemplateError};
    use crate::report::TrendStatus;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ADX_EXPORT: &str = "\
Section / القسم,Field (EN),الحقل (AR),Prev Year,Current,Target,Unit,Notes,Applicability,Input Type,Options
Environment,Scope 1 emissions,انبعاثات,1200,1100,1000,tCO2e,,All,Number,Free
Environment,Scope 2 emissions,انبعاثات,600,700,500,tCO2e,,All,Number,Free
Social,Employee turnover,دوران,10,10.2,8,%,,All,Number,Free
Governance,Board policy,سياسة,Yes,Yes,,,,All,Text,[Yes, No]
";

    fn write(content: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn reconciles_clean_export() -> Result<()> {
        let tmp = write(ADX_EXPORT)?;
        let report = reconcile_file(tmp.path(), "ADX_ESG", Settings::builtin())?;

        assert_eq!(report.template, "ADX_ESG");
        assert_eq!(report.columns.len(), 11);
        assert_eq!(report.match_result.match_percentage, 100.0);
        assert!(!report.match_result.has_ambiguity);
        assert!(report.malformed.is_empty());

        assert_eq!(report.changes.len(), 4);
        assert_eq!(report.changes[0].status, Some(TrendStatus::Improved));
        assert_eq!(report.changes[1].status, Some(TrendStatus::Worsened));
        assert_eq!(report.changes[2].status, Some(TrendStatus::Slight));
        assert_eq!(report.changes[3].status, None);
        assert_eq!(
            report.tally,
            ChangeTally {
                improved: 1,
                worsened: 1,
                slight: 1,
                no_data: 1
            }
        );

        assert_eq!(report.summary.sections, vec!["Environment", "Social", "Governance"]);
        assert!(report.charts.iter().any(|c| c.category == "emissions"));

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["changes"][1]["status"], "worsened");
        assert_eq!(json["changes"][0]["data"]["Field (EN)"], "Scope 1 emissions");
        Ok(())
    }

    #[test]
    fn wrong_template_reports_mismatch() -> Result<()> {
        let tmp = write(ADX_EXPORT)?;
        let report = reconcile_file(tmp.path(), "SME", Settings::builtin())?;
        assert!(report.match_result.has_ambiguity);
        assert!(report.match_result.match_percentage < 100.0);
        Ok(())
    }

    #[test]
    fn unknown_template_fails_before_reading() {
        let err = reconcile_file("/no/such/file.csv", "GRI", Settings::builtin()).unwrap_err();
        assert!(err.downcast_ref::<TemplateError>().is_some());
    }

    #[test]
    fn header_only_file_is_an_ingest_error() -> Result<()> {
        let tmp = write("Field (EN),Current\n")?;
        let err = reconcile_file(tmp.path(), "SME", Settings::builtin()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::HeaderOnly)
        ));
        Ok(())
    }
}
