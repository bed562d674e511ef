//! Shared utility functions for labels and file names.

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Formats a number with two significant digits and an SI suffix, the way
/// stream-count axes are labelled (`1500000` becomes `1.5M`).
pub fn format_si(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    let magnitude = value.abs();
    let (scaled, suffix) = SUFFIXES
        .iter()
        .find(|(threshold, _)| magnitude >= *threshold)
        .map_or((value, ""), |(threshold, suffix)| (value / threshold, *suffix));

    let digits = if scaled.abs() >= 10.0 { 0 } else { 1 };
    let formatted = format!("{scaled:.digits$}");
    let formatted = formatted
        .strip_suffix(".0")
        .map_or(formatted.clone(), ToString::to_string);
    format!("{formatted}{suffix}")
}

/// Turns a chart name into a safe file stem.
pub fn sanitize_file_stem(input: &str) -> String {
    let stem: String = input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() {
        "chart".to_string()
    } else {
        stem
    }
}
