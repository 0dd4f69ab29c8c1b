use std::sync::LazyLock;

use regex::Regex;

/// Ordered pattern list for explanation extraction; the first pattern that
/// matches wins. Each captures the explanation body up to its terminator.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // bold-labelled block, up to a horizontal rule, an explicit end
        // marker, or end of text
        r"(?si)\*\*(?:explanation|rationale)(?::\*\*|\*\*:|\*\*)\s*(.*?)(?:\n-{3,}|\n\*\*\s*end explanation\s*\*\*|\z)",
        // plain label, up to a blank line or the next option letter
        r"(?si)explanation:\s*(.*?)(?:\n\n|\n[A-Z]\.|\z)",
        // "Answer: X" with trailing text on the same line
        r"(?si)answer:\s*[A-Z]\.?\s*(.*?)(?:\n\n|\n[A-Z]\.|\z)",
        // "Answer: X" with the explanation on following lines
        r"(?si)answer:\s*[A-Z]\.?\s*\n(.*?)(?:\n\n|\n[A-Z]\.|\z)",
        // "Answer: X - text" with separator punctuation
        r"(?si)answer:\s*[A-Z]\.?\s*[-:\s]*(.*?)(?:\n\n|\n###|\z)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract at most one explanation from the tail text, prefixed
/// `"Explanation: "`. No match, or a match with an empty body, yields none.
pub fn extract(tail_text: &str) -> Vec<String> {
    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.captures(tail_text) {
            let body = caps[1].trim();
            if body.is_empty() {
                return Vec::new();
            }
            return vec![format!("Explanation: {}", body)];
        }
    }
    Vec::new()
}

// ── Tests ──
