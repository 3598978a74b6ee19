use serde::{Deserialize, Serialize};
use tracing::debug;

/// Joins overflow tokens that collapse into the notes column.
pub const NOTES_SEPARATOR: &str = ", ";

/// Where the free-text region of a row sits: everything after the first
/// `notes_start_index` tokens and before the last `fixed_suffix_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeLayout {
    pub notes_start_index: usize,
    pub fixed_suffix_count: usize,
}

/// Reshape `tokens` to exactly `target_count` values, merging overflow into
/// the notes column at `notes_start_index`.
pub fn normalize(
    tokens: Vec<String>,
    target_count: usize,
    notes_start_index: usize,
    fixed_suffix_count: usize,
) -> Vec<String> {
    reshape(
        tokens,
        target_count,
        Some(MergeLayout {
            notes_start_index,
            fixed_suffix_count,
        }),
    )
}

/// Reshape `tokens` to exactly `target` values.
///
/// - equal length: returned as is
/// - too short: right-padded with empty strings
/// - too long, `merge` set: overflow collapses into the notes column
/// - too long, no `merge`: truncated from the right
///
/// Total: the result always has `target` entries.
pub fn reshape(mut tokens: Vec<String>, target: usize, merge: Option<MergeLayout>) -> Vec<String> {
    if tokens.len() <= target {
        tokens.resize(target, String::new());
        return tokens;
    }
    match merge {
        Some(layout) => merge_into_notes(tokens, target, layout),
        None => {
            tokens.truncate(target);
            tokens
        }
    }
}

fn merge_into_notes(tokens: Vec<String>, target: usize, layout: MergeLayout) -> Vec<String> {
    let len = tokens.len();
    let prefix_len = layout.notes_start_index.min(len);
    let suffix_len = layout.fixed_suffix_count.min(len - prefix_len);

    let mut out = tokens;
    let mut middle = out.split_off(prefix_len);
    let suffix = middle.split_off(middle.len() - suffix_len);

    let expected_mid = target.saturating_sub(prefix_len + suffix_len);
    if middle.len() > expected_mid {
        // the first `len - expected + 1` middle tokens become one notes field
        let pass_through = expected_mid.saturating_sub(1);
        let tail = middle.split_off(middle.len() - pass_through);
        let notes = middle.join(NOTES_SEPARATOR);
        middle = std::iter::once(notes).chain(tail).collect();
    }

    out.extend(middle);
    out.extend(suffix);

    if out.len() != target {
        // prefix + suffix alone overflow the target; keep the leftmost values
        debug!(
            got = out.len(),
            target, "notes merge could not reach target width; truncating"
        );
        out.resize(target, String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{}", i)).collect()
    }

    #[test]
    fn canonical_length_is_untouched() {
        let row = toks(10);
        assert_eq!(normalize(row.clone(), 10, 7, 2), row);
    }

    #[test]
    fn short_rows_are_padded() {
        let out = normalize(toks(3), 6, 7, 2);
        assert_eq!(out, vec!["t0", "t1", "t2", "", "", ""]);
    }

    #[test]
    fn overflow_collapses_into_notes() {
        let out = normalize(toks(13), 10, 7, 2);
        assert_eq!(out.len(), 10);
        assert_eq!(&out[..7], &toks(7)[..]);
        assert_eq!(out[7], "t7, t8, t9, t10");
        assert_eq!(out[8], "t11");
        assert_eq!(out[9], "t12");
    }

    #[test]
    fn overflow_keeps_trailing_middle_columns() {
        // three middle slots: notes plus two pass-through columns
        let out = normalize(toks(8), 6, 2, 1);
        assert_eq!(out.len(), 6);
        assert_eq!(out[2], "t2, t3, t4");
        assert_eq!(&out[3..], &["t5", "t6", "t7"]);
    }

    #[test]
    fn pathological_layout_truncates() {
        // prefix + suffix already exceed the target
        let out = normalize(toks(12), 5, 4, 3);
        assert_eq!(&out[..4], &toks(4)[..]);
        assert_eq!(out[4], "t4, t5, t6, t7, t8");
    }

    #[test]
    fn truncates_without_merge() {
        assert_eq!(reshape(toks(4), 2, None), toks(2));
    }

    #[test]
    fn always_returns_target_length() {
        for len in 0..20 {
            for target in 0..15 {
                for start in 0..12 {
                    for suffix in 0..4 {
                        let out = normalize(toks(len), target, start, suffix);
                        assert_eq!(out.len(), target, "len={len} target={target}");
                    }
                }
            }
        }
    }
}
