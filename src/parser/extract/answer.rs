use std::sync::LazyLock;

use regex::Regex;

static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*ans(?:wer)?(?::\*\*|\*\*:|\*\*)\s*([A-Z])\.?").unwrap());
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(?([A-Z])\)?[.)]\s*").unwrap());

/// Find the declared answer letter in the tail text. Handles `**Answer:**`,
/// `**Answer**:`, `**Ans:**` and friends, any case, optional trailing period.
pub fn detect_letter(tail_text: &str) -> Option<char> {
    ANSWER_RE
        .captures(tail_text)
        .and_then(|caps| caps[1].chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// Map an answer letter to an option index. Prefers an exact label match
/// against the (normalized) options; otherwise assumes A=0 lettering. The
/// assumption is wrong for reordered or gapped labels and can run past the
/// end of short option lists, but is kept as-is rather than guessed around.
pub fn map_letter(letter: char, options: &[String]) -> usize {
    for (idx, option) in options.iter().enumerate() {
        let label = LABEL_RE
            .captures(option)
            .and_then(|caps| caps[1].chars().next())
            .map(|c| c.to_ascii_uppercase());
        if label == Some(letter) {
            return idx;
        }
    }
    (letter as u8 - b'A') as usize
}

// ── Tests ──
