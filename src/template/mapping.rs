use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::process::Table;

/// Pairing of one template column with the uploaded column that supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub template_column: String,
    pub uploaded_column: Option<String>,
}

fn words(name: &str) -> BTreeSet<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn exact(t: &str, u: &str) -> bool {
    t == u
}

fn case_insensitive(t: &str, u: &str) -> bool {
    t.trim().to_lowercase() == u.trim().to_lowercase()
}

fn word_overlap(t: &str, u: &str) -> bool {
    let tw = words(t);
    if tw.is_empty() {
        return false;
    }
    let common = tw.intersection(&words(u)).count();
    common >= tw.len().min(2)
}

/// Propose an uploaded column for every template column.
///
/// Strategies run as separate passes, strongest first (exact, then
/// case-insensitive, then word overlap), and an uploaded column is handed
/// out at most once, so a weak match never steals a column another template
/// column matches exactly. Output follows `template_columns` order.
pub fn suggest_mappings<T, U>(template_columns: &[T], uploaded_columns: &[U]) -> Vec<ColumnMapping>
where
    T: AsRef<str>,
    U: AsRef<str>,
{
    let mut chosen: Vec<Option<usize>> = vec![None; template_columns.len()];
    let mut taken = vec![false; uploaded_columns.len()];

    let passes: [fn(&str, &str) -> bool; 3] = [exact, case_insensitive, word_overlap];
    for matches in passes {
        for (ti, t) in template_columns.iter().enumerate() {
            if chosen[ti].is_some() {
                continue;
            }
            let hit = uploaded_columns
                .iter()
                .enumerate()
                .find(|(ui, u)| !taken[*ui] && matches(t.as_ref(), u.as_ref()))
                .map(|(ui, _)| ui);
            if let Some(ui) = hit {
                taken[ui] = true;
                chosen[ti] = Some(ui);
            }
        }
    }

    template_columns
        .iter()
        .zip(chosen)
        .map(|(t, ui)| {
            let template_column: &str = t.as_ref();
            let uploaded_column = ui.map(|i| uploaded_columns[i].as_ref().to_string());
            debug!(template = template_column, uploaded = ?uploaded_column, "suggested mapping");
            ColumnMapping {
                template_column: template_column.to_string(),
                uploaded_column,
            }
        })
        .collect()
}

/// Copy of `table` with uploaded headers renamed to their template names.
/// Mappings naming a column the table does not have are skipped.
pub fn apply_mapping(table: &Table, mappings: &[ColumnMapping]) -> Table {
    let mut headers = table.headers.clone();
    for m in mappings {
        let Some(uploaded) = m.uploaded_column.as_deref() else {
            continue;
        };
        match table.column_index(uploaded) {
            Some(i) => headers[i] = m.template_column.clone(),
            None => warn!(
                column = uploaded,
                template_column = %m.template_column,
                "mapped column not present in table; ignoring"
            ),
        }
    }
    Table::new(headers, table.rows.clone())
}
