use std::sync::LazyLock;

use regex::Regex;

static DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(Lunes|Martes|Miércoles|Miercoles|Jueves|Viernes|Sábado|Sabado|Domingo|Diario|Laborables|Festivos|Del\s+\d+|Del\s+\w+)",
    )
    .unwrap()
});
static LEADING_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d").unwrap());

/// Longer lines are synopsis prose that happens to name a weekday.
const MAX_DAY_LINE_CHARS: usize = 80;
const MAX_DAY_LABEL_CHARS: usize = 50;

/// Day label announced by this line, if any.
///
/// "Lunes 27: 17:00" yields "Lunes 27". The label may come back empty
/// (": 17:00 lunes"); callers treat an empty label as no day.
pub fn detect(text: &str) -> Option<String> {
    if text.chars().count() >= MAX_DAY_LINE_CHARS || !DAY_RE.is_match(text) {
        return None;
    }

    let mut candidate = text.trim();
    if let Some((head, tail)) = candidate.split_once(':') {
        if LEADING_DIGIT_RE.is_match(tail) {
            candidate = head.trim();
        }
    }
    let candidate = candidate.trim_end_matches(':').trim();

    if candidate.chars().count() >= MAX_DAY_LABEL_CHARS {
        return None;
    }
    Some(capitalize(candidate))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
