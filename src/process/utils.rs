/// Cell values that mean "nothing here" once trimmed, compared case-insensitively.
pub const NULL_MARKERS: [&str; 3] = ["", "nan", "none"];

/// Trim whitespace and strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn is_null_marker(raw: &str) -> bool {
    let t = raw.trim();
    NULL_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m))
}

/// Parse a loosely formatted number: thousands separators and percent signs
/// are dropped, surrounding quotes and whitespace ignored. Non-finite results
/// (`inf`, `NaN`) are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let stripped: String = clean_str(raw)
        .chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect();
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Round to two decimal places, the precision every percentage is reported at.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_markers_are_case_insensitive() {
        assert!(is_null_marker("  "));
        assert!(is_null_marker("NaN"));
        assert!(is_null_marker(" None "));
        assert!(!is_null_marker("0"));
        assert!(!is_null_marker("n/a"));
    }

    #[test]
    fn parse_number_strips_separators() {
        assert_eq!(parse_number("1,250"), Some(1250.0));
        assert_eq!(parse_number("45%"), Some(45.0));
        assert_eq!(parse_number(" \"-3.5\" "), Some(-3.5));
        assert_eq!(parse_number("12 tCO2e"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn round2_rounds_half_away() {
        assert_eq!(round2(200.0 / 3.0), 66.67);
        assert_eq!(round2(5.0), 5.0);
    }
}
