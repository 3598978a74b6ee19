// src/schema/types.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Matches synthesized header names: our own `Unnamed_3` (or `Unnamed_3_1`
/// after a clash) as well as the `Unnamed: 3` spelling spreadsheet exports produce.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^unnamed(?:[_:]\s*\d+)*$").expect("valid placeholder regex"));

/// Canonical width and header of one input file, detected once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_count: usize,
    /// One name per column, blanks replaced by placeholders.
    pub headers: Vec<String>,
    /// Token count → number of lines voting for it. Empty when the count was forced.
    pub votes: BTreeMap<usize, usize>,
    /// The count came from the caller instead of the vote.
    pub forced: bool,
}

/// Name given to a blank header slot at `index`.
pub fn placeholder_name(index: usize) -> String {
    format!("Unnamed_{}", index)
}

/// Make every header name non-blank and distinct.
///
/// Non-blank names claim their spelling first, in column order; a repeat gets
/// `_1`, `_2`, ... appended. Blank slots then take `Unnamed_{index}`, suffixed
/// the same way if a real column already uses that name.
pub fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut claim = |base: String| -> String {
        let mut candidate = base.clone();
        let mut n = 1;
        while !taken.insert(candidate.clone()) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        candidate
    };

    let mut out: Vec<Option<String>> = names
        .into_iter()
        .map(|name| (!name.trim().is_empty()).then_some(name))
        .collect();
    for slot in out.iter_mut().flatten() {
        *slot = claim(std::mem::take(slot));
    }
    out.into_iter()
        .enumerate()
        .map(|(idx, slot)| slot.unwrap_or_else(|| claim(placeholder_name(idx))))
        .collect()
}

pub fn is_placeholder(name: &str) -> bool {
    PLACEHOLDER_RE.is_match(name.trim())
}
