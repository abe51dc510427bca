use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Duración:\s*(\d+)\s*min").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Año:\s*(\d{4})").unwrap());

/// "Duración: 120 min" → "120 min".
pub fn duration(text: &str) -> Option<String> {
    DURATION_RE
        .captures(text)
        .map(|c| format!("{} min", &c[1]))
}

/// "Año: 2025" → "2025".
pub fn year(text: &str) -> Option<String> {
    YEAR_RE.captures(text).map(|c| c[1].to_string())
}
