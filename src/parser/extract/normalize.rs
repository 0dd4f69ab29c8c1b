use std::sync::LazyLock;

use regex::Regex;

static PRIMARY_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?([A-Z])\)?[.)]\s*(.*)").unwrap());
static NESTED_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[(\[]?[A-Z][.)]\s*(.*)").unwrap());
static NESTED_SPACED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\s*[.)]\s*(.*)").unwrap());

/// Re-emit an option as `"<LABEL>) <text>"`, or bare text when no label was
/// ever present. Sources sometimes double-label ("A) C. text"), so label-like
/// markers are stripped from the remainder until none are left.
pub fn normalize(option: &str) -> String {
    let text = option.trim();
    let (label, mut remainder) = match PRIMARY_LABEL_RE.captures(text) {
        Some(caps) => (
            caps[1].chars().next().map(|c| c.to_ascii_uppercase()),
            caps[2].trim().to_string(),
        ),
        None => (None, text.to_string()),
    };

    loop {
        let stripped = NESTED_LABEL_RE
            .captures(&remainder)
            .or_else(|| NESTED_SPACED_RE.captures(&remainder))
            .map(|caps| caps[1].trim().to_string());
        match stripped {
            Some(next) => remainder = next,
            None => break,
        }
    }

    match label {
        Some(label) => format!("{}) {}", label, remainder),
        None => remainder,
    }
}

pub fn normalize_all(options: &[String]) -> Vec<String> {
    options.iter().map(|option| normalize(option)).collect()
}

// ── Tests ──
