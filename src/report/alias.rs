use serde::{Deserialize, Serialize};

use super::Record;
use crate::process::utils::is_null_marker;

/// A logical field that different templates spell differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Section,
    Field,
    PrevYear,
    Current,
    Target,
    Unit,
    Notes,
}

impl LogicalField {
    pub const ALL: [LogicalField; 7] = [
        LogicalField::Section,
        LogicalField::Field,
        LogicalField::PrevYear,
        LogicalField::Current,
        LogicalField::Target,
        LogicalField::Unit,
        LogicalField::Notes,
    ];
}

/// Candidate column names for each logical field, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    pub section: Vec<String>,
    pub field: Vec<String>,
    pub prev_year: Vec<String>,
    pub current: Vec<String>,
    pub target: Vec<String>,
    pub unit: Vec<String>,
    pub notes: Vec<String>,
}

impl FieldAliases {
    pub fn group(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::Section => &self.section,
            LogicalField::Field => &self.field,
            LogicalField::PrevYear => &self.prev_year,
            LogicalField::Current => &self.current,
            LogicalField::Target => &self.target,
            LogicalField::Unit => &self.unit,
            LogicalField::Notes => &self.notes,
        }
    }

    /// Resolve `field` in `record` through its alias group.
    pub fn lookup<'r>(&self, record: &'r Record, field: LogicalField) -> Option<&'r str> {
        resolve(record, self.group(field))
    }
}

/// Value of the first candidate column present in `record` holding a usable
/// value (not blank, not `nan`/`none`). `None` is an ordinary outcome.
pub fn resolve<'r, S: AsRef<str>>(record: &'r Record, candidates: &[S]) -> Option<&'r str> {
    candidates
        .iter()
        .filter_map(|name| record.get(name.as_ref()))
        .find(|value| !is_null_marker(value))
}
