pub mod answer;
pub mod explanation;
pub mod normalize;
pub mod options;

use super::locate::Layout;

/// Everything the tail (plus a mixed prompt section) yields for one question.
pub struct Extracted {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
    pub explanations: Vec<String>,
}

/// Run option, answer and explanation extraction over the tail sections,
/// then reconcile with options embedded in the prompt itself.
pub fn extract_all(layout: &Layout, sections: &[String]) -> Extracted {
    let tail = &sections[layout.tail_start.min(sections.len())..];
    let tail_text = tail.join("\n\n");

    let letter = answer::detect_letter(&tail_text);
    let mut collected = options::collect(tail);
    let explanations = explanation::extract(&tail_text);

    let mut prompt = layout.prompt.clone().unwrap_or_default();
    let (cleaned, embedded) = options::split_from_prompt(&prompt);
    if !embedded.is_empty() {
        // prompt and options shared a section: the prompt's own lines win
        collected = embedded;
        prompt = cleaned;
    }

    let normalized = normalize::normalize_all(&collected);
    let correct_answer = letter.map(|l| answer::map_letter(l, &normalized));

    Extracted {
        prompt,
        options: normalized,
        correct_answer,
        explanations,
    }
}

// ── Tests ──
