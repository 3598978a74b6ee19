use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::normalize::reshape;
use super::tokenize::split_line;
use super::IngestOptions;
use crate::error::IngestError;
use crate::report::Record;
use crate::schema::{detect_schema, is_placeholder, unique_headers, ColumnSchema};

/// Leading values kept in a malformed-row preview.
const PREVIEW_LEN: usize = 5;

/// A uniform table: every row has exactly `headers.len()` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, forcing every row to the header width.
    ///
    /// Rows wider than the header first extend the header with placeholder
    /// names, so no value is silently dropped here; the builder has already
    /// reshaped rows, so this only fires for hand-assembled tables. Header
    /// names come out distinct and non-blank.
    pub fn new(mut headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        if headers.len() < widest {
            headers.resize(widest, String::new());
        }
        let headers = unique_headers(headers);
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// One `name → value` record per row, skipping blank and placeholder columns.
    pub fn records(&self) -> Vec<Record> {
        let keep: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.trim().is_empty() && !is_placeholder(h))
            .map(|(i, _)| i)
            .collect();

        self.rows
            .iter()
            .map(|row| {
                keep.iter()
                    .map(|&i| (self.headers[i].clone(), row[i].clone()))
                    .collect()
            })
            .collect()
    }
}

/// One data line whose token count disagreed with the canonical count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRow {
    /// 1-based position among the non-blank input lines; the header is line 1.
    pub line: usize,
    pub token_count: usize,
    pub preview: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRowReport {
    pub expected_columns: usize,
    pub rows: Vec<MalformedRow>,
}

impl MalformedRowReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Detect the schema of `lines` (header first), then reshape every data line
/// to it. Row-level problems are repaired and reported; only empty or
/// header-only input fails.
pub fn build_table<S: AsRef<str>>(
    lines: &[S],
    opts: &IngestOptions,
) -> Result<(Table, MalformedRowReport), IngestError> {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.as_ref().trim_end_matches(&['\r', '\n'][..]))
        .filter(|l| !l.trim().is_empty())
        .collect();

    match lines.len() {
        0 => return Err(IngestError::Empty),
        1 => return Err(IngestError::HeaderOnly),
        n => debug!(lines = n, "building table"),
    }

    let ColumnSchema {
        column_count,
        headers,
        votes,
        ..
    } = detect_schema(&lines, opts);
    debug!(column_count, ?votes, "schema detected");

    let mut report = MalformedRowReport {
        expected_columns: column_count,
        rows: Vec::new(),
    };
    let mut rows = Vec::with_capacity(lines.len() - 1);

    for (idx, line) in lines.iter().enumerate().skip(1) {
        let tokens = split_line(line, opts.preserve_brackets);
        if tokens.len() != column_count {
            let malformed = MalformedRow {
                line: idx + 1,
                token_count: tokens.len(),
                preview: tokens.iter().take(PREVIEW_LEN).cloned().collect(),
            };
            if report.rows.len() < PREVIEW_LEN {
                debug!(
                    line = malformed.line,
                    got = malformed.token_count,
                    expected = column_count,
                    "row has wrong field count"
                );
            }
            report.rows.push(malformed);
        }
        rows.push(reshape(tokens, column_count, opts.merge_layout()));
    }

    let table = Table::new(headers, rows);
    if table.width() != column_count {
        warn!(
            width = table.width(),
            column_count, "header width differs from detected column count"
        );
    }

    info!(
        rows = table.len(),
        columns = table.width(),
        malformed = report.len(),
        "table built"
    );
    if !report.is_empty() {
        warn!("{} rows had wrong column counts", report.len());
    }

    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Section,Field,Prev Year,Current,Unit
Environment,Scope 1 emissions,1,200,1,150,[tCO2e, market]
Social,Employee turnover,12,10,%

Governance,Board independence,40,45,%";

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn builds_uniform_table() {
        let (table, report) = build_table(&lines(SAMPLE), &IngestOptions::default()).unwrap();

        assert_eq!(table.width(), 7);
        assert_eq!(table.len(), 3);
        assert!(table.rows.iter().all(|r| r.len() == 7));
        assert_eq!(
            table.headers,
            vec!["Section", "Field", "Prev Year", "Current", "Unit", "Unnamed_5", "Unnamed_6"]
        );
        assert_eq!(table.rows[0][6], "[tCO2e, market]");

        // the blank line is dropped before numbering
        assert_eq!(report.expected_columns, 7);
        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[0].line, 3);
        assert_eq!(report.rows[0].token_count, 5);
        assert_eq!(report.rows[1].line, 4);
        assert_eq!(
            report.rows[1].preview,
            vec!["Governance", "Board independence", "40", "45", "%"]
        );
    }

    #[test]
    fn forced_count_merges_overflow_into_notes() {
        let text = "\
a,b,c,d
1,2,free,text,with,commas,9";
        let opts = IngestOptions {
            num_columns: Some(4),
            notes_start_index: 2,
            fixed_suffix_count: 1,
            ..IngestOptions::default()
        };
        let (table, report) = build_table(&lines(text), &opts).unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", "free, text, with, commas", "9"]);
        assert_eq!(report.rows[0].token_count, 7);
        assert_eq!(report.rows[0].preview.len(), 5);
    }

    #[test]
    fn empty_input_is_a_file_error() {
        let none: Vec<&str> = vec!["", "   "];
        assert!(matches!(
            build_table(&none, &IngestOptions::default()),
            Err(IngestError::Empty)
        ));
    }

    #[test]
    fn header_only_is_a_file_error() {
        assert!(matches!(
            build_table(&["A,B,C"], &IngestOptions::default()),
            Err(IngestError::HeaderOnly)
        ));
    }

    #[test]
    fn new_pads_header_for_wide_rows() {
        let table = Table::new(
            vec!["A".into()],
            vec![vec!["1".into(), "2".into()], vec![]],
        );
        assert_eq!(table.headers, vec!["A", "Unnamed_1"]);
        assert_eq!(table.rows[1], vec!["", ""]);
    }

    #[test]
    fn duplicate_headers_keep_every_column() {
        let table = Table::new(
            vec!["Current".into(), "Current".into()],
            vec![vec!["1".into(), "2".into()]],
        );
        assert_eq!(table.headers, vec!["Current", "Current_1"]);
        let recs = table.records();
        assert_eq!(recs[0].get("Current"), Some("1"));
        assert_eq!(recs[0].get("Current_1"), Some("2"));
    }

    #[test]
    fn records_skip_placeholder_columns() {
        let table = Table::new(
            vec!["A".into(), "Unnamed_1".into(), "C".into()],
            vec![vec!["1".into(), "junk".into(), "3".into()]],
        );
        let recs = table.records();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].get("A"), Some("1"));
        assert_eq!(recs[0].get("Unnamed_1"), None);
        assert_eq!(recs[0].len(), 2);
    }
}
