use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split a block body on blank-line boundaries into trimmed, non-empty
/// sections. Every later stage works on this sequence by index.
pub fn split(body: &str) -> Vec<String> {
    BLANK_LINE_RE
        .split(body)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ── Tests ──
