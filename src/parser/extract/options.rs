use std::sync::LazyLock;

use regex::Regex;

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?([A-Z])\)?[.)]\s*(.*)").unwrap());
static PROMPT_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][.)]\s*").unwrap());

/// Collect labelled option lines from the tail sections, in document order.
pub fn collect(tail: &[String]) -> Vec<String> {
    let mut options = Vec::new();
    for section in tail {
        for line in section.lines() {
            let line = line.trim();
            if let Some(caps) = OPTION_RE.captures(line) {
                options.push(format!("{}) {}", &caps[1], caps[2].trim()));
            }
        }
    }
    options
}

/// Pull option lines out of a prompt that mixes question and options in one
/// section. Returns the cleaned prompt and the options found; the caller
/// lets these supersede anything collected from the tail.
pub fn split_from_prompt(prompt: &str) -> (String, Vec<String>) {
    let mut options = Vec::new();
    let mut rest = Vec::new();
    for line in prompt.lines() {
        let stripped = line.trim();
        if PROMPT_OPTION_RE.is_match(stripped) {
            options.push(stripped.to_string());
        } else {
            rest.push(line);
        }
    }
    (rest.join("\n").trim().to_string(), options)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn collects_labelled_lines() {
        let tail = secs(&["A) Aspirin\nB. Clopidogrel\n(C) Ticagrelor", "**Answer:** A"]);
        assert_eq!(collect(&tail), vec!["A) Aspirin", "B) Clopidogrel", "C) Ticagrelor"]);
    }

    #[test]
    fn prose_lines_are_not_options() {
        let tail = secs(&["ECG shows ST elevation\nTreat immediately"]);
        assert!(collect(&tail).is_empty());
    }

    #[test]
    fn answer_and_explanation_lines_are_not_options() {
        let tail = secs(&["Answer: B\nExplanation: because"]);
        assert!(collect(&tail).is_empty());
    }

    #[test]
    fn prompt_with_mixed_options_is_split() {
        let (prompt, options) = split_from_prompt("Identify the rhythm.\nA) AF\nB) VT");
        assert_eq!(prompt, "Identify the rhythm.");
        assert_eq!(options, vec!["A) AF", "B) VT"]);
    }

    #[test]
    fn prompt_without_options_is_untouched() {
        let (prompt, options) = split_from_prompt("What is the diagnosis?");
        assert_eq!(prompt, "What is the diagnosis?");
        assert!(options.is_empty());
    }

    #[test]
    fn unspaced_option_labels_still_split_from_prompt() {
        let (_, options) = split_from_prompt("Question?\nA)First\nB)Second");
        assert_eq!(options, vec!["A)First", "B)Second"]);
    }
}
