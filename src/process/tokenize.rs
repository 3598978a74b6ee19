//! Bracket-aware line splitting.
//!
//! Export artifacts carry unit annotations such as `[tCO2e, scope 1]` with
//! unescaped commas inside. A comma only separates fields at bracket depth
//! zero; anything inside `[...]`, nested brackets included, is kept verbatim.

/// Split `line` into trimmed fields, keeping bracketed regions intact.
pub fn tokenize(line: &str) -> Vec<String> {
    split_line(line, true)
}

/// Split `line` on commas. With `preserve_brackets` off every comma separates.
///
/// An unmatched `]` never drives the depth below zero, and an unmatched `[`
/// simply runs to the end of the line, which becomes the last field.
pub fn split_line(line: &str, preserve_brackets: bool) -> Vec<String> {
    if !preserve_brackets {
        return line.split(',').map(|p| p.trim().to_string()).collect();
    }

    let mut parts = Vec::new();
    let mut cur = String::new();
    let mut depth: usize = 0;

    for ch in line.chars() {
        match ch {
            '[' => {
                depth += 1;
                cur.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                cur.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(cur.trim().to_string());
                cur.clear();
            }
            _ => cur.push(ch),
        }
    }
    if !cur.is_empty() {
        parts.push(cur.trim().to_string());
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_brackets_atomic() {
        assert_eq!(tokenize("a,[b,c],d"), vec!["a", "[b,c]", "d"]);
    }

    #[test]
    fn keeps_nested_brackets_atomic() {
        assert_eq!(tokenize("a,[b,[c,d]],e"), vec!["a", "[b,[c,d]]", "e"]);
    }

    #[test]
    fn trims_each_field() {
        assert_eq!(
            tokenize("  Energy ,  1,200 [kWh, grid] , x "),
            vec!["Energy", "1", "200 [kWh, grid]", "x"]
        );
    }

    #[test]
    fn stray_closing_bracket_does_not_go_negative() {
        // the `]` is absorbed; the following `[` opens a fresh region
        assert_eq!(tokenize("a],b,[c,d]"), vec!["a]", "b", "[c,d]"]);
    }

    #[test]
    fn unmatched_open_bracket_runs_to_end() {
        assert_eq!(tokenize("a,[b,c,d"), vec!["a", "[b,c,d"]);
    }

    #[test]
    fn empty_middle_fields_survive() {
        assert_eq!(tokenize("a,,b"), vec!["a", "", "b"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn plain_split_ignores_brackets() {
        assert_eq!(split_line("a,[b,c],d", false), vec!["a", "[b", "c]", "d"]);
    }
}
