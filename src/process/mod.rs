// src/process/mod.rs
pub mod normalize;
pub mod table;
pub mod tokenize;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::debug;

use crate::error::IngestError;

pub use normalize::{normalize, reshape, MergeLayout};
pub use table::{build_table, MalformedRow, MalformedRowReport, Table};
pub use tokenize::{split_line, tokenize};

/// Knobs for turning raw lines into a uniform table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Skip detection and use this many columns.
    pub num_columns: Option<usize>,
    /// Treat `[...]` as one atomic unit while splitting.
    pub preserve_brackets: bool,
    /// Collapse overflow fields into the notes column instead of truncating.
    pub merge_excess_into_notes: bool,
    /// Column index where the notes region begins (0-based).
    pub notes_start_index: usize,
    /// Columns at the end of a row that are never merged.
    pub fixed_suffix_count: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            num_columns: None,
            preserve_brackets: true,
            merge_excess_into_notes: true,
            notes_start_index: 7,
            fixed_suffix_count: 2,
        }
    }
}

impl IngestOptions {
    pub fn merge_layout(&self) -> Option<MergeLayout> {
        self.merge_excess_into_notes.then_some(MergeLayout {
            notes_start_index: self.notes_start_index,
            fixed_suffix_count: self.fixed_suffix_count,
        })
    }
}

/// Read `path` as (lossy) UTF-8 and build a uniform table from its lines.
#[tracing::instrument(level = "info", skip(path, opts), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(
    path: P,
    opts: &IngestOptions,
) -> Result<(Table, MalformedRowReport), IngestError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => IngestError::NotFound(path.to_path_buf()),
        _ => IngestError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let text = String::from_utf8_lossy(&bytes);
    debug!(bytes = bytes.len(), "read input");

    let lines: Vec<&str> = text.lines().collect();
    build_table(&lines, opts)
}
