use std::collections::BTreeMap;
use tracing::{debug, info};

use super::types::{unique_headers, ColumnSchema};
use crate::process::normalize::reshape;
use crate::process::tokenize::split_line;
use crate::process::IngestOptions;

/// Infer the canonical column count and header for `lines` (header first).
///
/// A forced `opts.num_columns` wins outright. Otherwise every line votes with
/// its token count, except single-token lines, which are nearly always blank
/// or degenerate. The widest vote wins: malformed rows in these exports lose
/// separators far more often than they gain them. One row with spurious extra
/// separators will overstate the width; the vote distribution is kept on the
/// schema so callers can spot that.
pub fn detect_schema<S: AsRef<str>>(lines: &[S], opts: &IngestOptions) -> ColumnSchema {
    let raw_header = lines
        .first()
        .map(|l| split_line(l.as_ref(), opts.preserve_brackets))
        .unwrap_or_default();

    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    let column_count = match opts.num_columns {
        Some(n) => {
            info!(columns = n, "using forced column count");
            n
        }
        None => {
            for line in lines {
                let n = split_line(line.as_ref(), opts.preserve_brackets).len();
                if n > 1 {
                    *votes.entry(n).or_default() += 1;
                }
            }
            let detected = votes
                .keys()
                .next_back()
                .copied()
                .unwrap_or_else(|| raw_header.len().max(1));
            debug!(?votes, detected, "column count vote");
            detected
        }
    };

    let headers = unique_headers(reshape(raw_header, column_count, opts.merge_layout()));

    ColumnSchema {
        column_count,
        headers,
        votes,
        forced: opts.num_columns.is_some(),
    }
}
