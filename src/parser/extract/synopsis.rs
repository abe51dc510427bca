//! Synopsis heuristics.
//!
//! Listing pages put the plot summary in one of three shapes: a paragraph
//! right after a bare "ARGUMENTO" header, a paragraph that starts with the
//! label itself, or an unlabelled long paragraph. Each shape is one rule;
//! rules run in table order and the first one that yields a step wins.

use std::sync::LazyLock;

use regex::Regex;

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(ARGUMENTO|SINOPSIS)[\s:]*").unwrap());

/// Matched on uppercased text.
const SYNOPSIS_LABELS: &[&str] = &["ARGUMENTO", "SINOPSIS"];

/// Technical-sheet labels; a paragraph carrying one is not a synopsis.
const METADATA_LABELS: &[&str] = &["Título original:", "Dirección:", "Reparto:", "FICHA"];

/// Schedule words that disqualify an unlabelled paragraph.
const SCHEDULE_MARKERS: &[&str] = &[
    "HORARIO", "Sábado", "Domingo", "Lunes", "Martes", "Miércoles", "Jueves", "Viernes",
];

const MIN_AFTER_HEADER_CHARS: usize = 30;
const MIN_LABELLED_CHARS: usize = 10;
const MAX_BARE_HEADER_CHARS: usize = 30;
const MIN_ORPHAN_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum SynopsisStep {
    /// Store this text as the synopsis.
    Capture(String),
    /// The node was a bare header; the synopsis should be the next node.
    ExpectNext,
}

pub struct SynopsisRule {
    pub name: &'static str,
    pub apply: fn(text: &str, len: usize, expecting: bool) -> Option<SynopsisStep>,
}

pub const RULES: &[SynopsisRule] = &[
    SynopsisRule { name: "after_header", apply: after_header },
    SynopsisRule { name: "labelled", apply: labelled },
    SynopsisRule { name: "orphan_paragraph", apply: orphan_paragraph },
];

/// Run the rules in order. Returns the winning rule's name with its step.
pub fn evaluate(text: &str, expecting: bool) -> Option<(&'static str, SynopsisStep)> {
    let len = text.chars().count();
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(text, len, expecting).map(|step| (rule.name, step)))
}

fn after_header(text: &str, len: usize, expecting: bool) -> Option<SynopsisStep> {
    (expecting && len > MIN_AFTER_HEADER_CHARS && !contains_any(text, METADATA_LABELS))
        .then(|| SynopsisStep::Capture(text.trim().to_string()))
}

fn labelled(text: &str, len: usize, _expecting: bool) -> Option<SynopsisStep> {
    if len <= MIN_LABELLED_CHARS || !contains_any(&text.to_uppercase(), SYNOPSIS_LABELS) {
        return None;
    }
    if len < MAX_BARE_HEADER_CHARS {
        return Some(SynopsisStep::ExpectNext);
    }
    let stripped = LABEL_RE.replacen(text, 1, "");
    Some(SynopsisStep::Capture(stripped.trim().to_string()))
}

fn orphan_paragraph(text: &str, len: usize, _expecting: bool) -> Option<SynopsisStep> {
    (len > MIN_ORPHAN_CHARS
        && !contains_any(text, METADATA_LABELS)
        && !contains_any(text, SCHEDULE_MARKERS))
        .then(|| SynopsisStep::Capture(text.trim().to_string()))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}
