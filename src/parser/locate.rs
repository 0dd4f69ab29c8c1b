use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static OPTION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[A-Z][.)]\s").unwrap());
static INVESTIGATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*investigations?(?::\*\*|\*\*:|\*\*)\s*").unwrap());
static IMAGE_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[IMAGE:\s*[^\]]+\]|!\[Image\]\([^)]+\))\s*$").unwrap()
});
static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!]\s+").unwrap());

/// Where each piece of a question lives among its sections. Built in one
/// pass by `locate`; the tail (sections from `tail_start` on) is handed to
/// the option/answer extractor.
#[derive(Debug, Clone)]
pub struct Layout {
    pub scenario: String,
    pub investigations: String,
    pub image: String,
    pub prompt: Option<String>,
    pub prompt_from_first: bool,
    pub tail_start: usize,
}

/// Classify a block's sections into scenario / investigations / image /
/// prompt / tail. Quiz sources are inconsistently authored, so every step
/// degrades instead of rejecting; a missing prompt stays empty rather than
/// being invented.
pub fn locate(sections: &[String]) -> Layout {
    let mut layout = Layout {
        scenario: sections.first().cloned().unwrap_or_default(),
        investigations: String::new(),
        image: String::new(),
        prompt: None,
        prompt_from_first: false,
        tail_start: 1,
    };

    // 1. Options already in the first section: it is the prompt, not a scenario.
    if let Some(first) = sections.first() {
        if OPTION_LINE_RE.is_match(first) {
            layout.scenario.clear();
            layout.prompt = Some(first.clone());
            layout.prompt_from_first = true;
        }
    }

    // 2. First section carrying an investigation label.
    let inv_idx = detect_investigations(&mut layout, sections);

    // 3. Resolve the section that should carry the prompt. Skipped entirely
    // when step 1 already claimed it.
    if !layout.prompt_from_first {
        match inv_idx {
            Some(i) if i + 1 < sections.len() => {
                resolve_prompt_section(&mut layout, sections, i + 1)
            }
            Some(i) => {
                // Marker is the last section: the scenario's final paragraph
                // doubles as the prompt.
                if let Some(pos) = layout.scenario.rfind("\n\n") {
                    let para = layout.scenario.split_off(pos);
                    layout.prompt = Some(para.trim().to_string());
                }
                layout.tail_start = i + 1;
            }
            None if sections.len() >= 2 => resolve_prompt_section(&mut layout, sections, 1),
            None => {}
        }
    }

    // 4. Prompt still a bare image token: recover question text from the
    // tail or the scenario, or leave it empty.
    recover_image_prompt(&mut layout, sections);

    layout
}

fn detect_investigations(layout: &mut Layout, sections: &[String]) -> Option<usize> {
    for (i, section) in sections.iter().enumerate() {
        if INVESTIGATION_RE.is_match(section) {
            layout.investigations = INVESTIGATION_RE.replace_all(section, "").trim().to_string();
            if !layout.prompt_from_first {
                layout.scenario = sections[..i].join("\n\n");
            }
            return Some(i);
        }
    }
    None
}

fn resolve_prompt_section(layout: &mut Layout, sections: &[String], at: usize) {
    let candidate = &sections[at];

    // Section that is nothing but an image token: the prompt should follow it.
    if IMAGE_ONLY_RE.is_match(candidate) {
        layout.image = candidate.trim().to_string();
        if at + 1 < sections.len() {
            layout.prompt = Some(sections[at + 1].clone());
            layout.tail_start = at + 2;
        } else {
            layout.tail_start = at + 1;
        }
        return;
    }

    // Image embedded mid-section: text after it is the question, text before
    // it is discarded context.
    let lines: Vec<&str> = candidate.lines().collect();
    if let Some(img) = lines.iter().position(|l| IMAGE_ONLY_RE.is_match(l)) {
        let after = lines[img + 1..].join("\n");
        let after = after.trim();
        layout.prompt = Some(if after.is_empty() {
            candidate.clone()
        } else {
            after.to_string()
        });
        layout.tail_start = at + 1;
        return;
    }

    layout.prompt = Some(candidate.clone());
    layout.tail_start = at + 1;
}

fn recover_image_prompt(layout: &mut Layout, sections: &[String]) {
    let prompt_is_image = layout
        .prompt
        .as_deref()
        .is_some_and(|p| IMAGE_ONLY_RE.is_match(p));
    if !prompt_is_image {
        return;
    }

    // The question text usually sits just above the options.
    let tail = &sections[layout.tail_start.min(sections.len())..];
    if let Some(section) = tail.iter().find(|s| OPTION_LINE_RE.is_match(s)) {
        let mut leading = Vec::new();
        for line in section.lines() {
            if OPTION_LINE_RE.is_match(line) {
                break;
            }
            if !line.trim().is_empty() {
                leading.push(line.trim());
            }
        }
        let text = leading.join(" ");
        if text.ends_with('?') || text.len() > 10 {
            layout.prompt = Some(text);
            return;
        }
    }

    let scenario = layout.scenario.trim();
    if scenario.ends_with('?') {
        if let Some(last) = SENTENCE_END_RE.split(scenario).last() {
            let last = last.trim();
            if last.ends_with('?') {
                layout.prompt = Some(last.to_string());
                return;
            }
        }
    }

    // Never synthesize question text.
    layout.prompt = None;
}

/// Tally of investigation label spellings seen in a document. Surfaced at
/// import time to spot formatting drift across quiz sources.
pub fn label_variants(content: &str) -> HashMap<String, usize> {
    let mut variants = HashMap::new();
    for m in INVESTIGATION_RE.find_iter(content) {
        *variants.entry(m.as_str().trim().to_string()).or_insert(0) += 1;
    }
    variants
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scenario_investigations_prompt() {
        let sections = secs(&[
            "A 65-year-old man presents with chest pain.",
            "**Investigations:** ECG shows ST elevation.",
            "What is the diagnosis?",
            "A) MI\nB) Angina",
        ]);
        let layout = locate(&sections);
        assert_eq!(layout.scenario, "A 65-year-old man presents with chest pain.");
        assert_eq!(layout.investigations, "ECG shows ST elevation.");
        assert_eq!(layout.prompt.as_deref(), Some("What is the diagnosis?"));
        assert_eq!(layout.tail_start, 3);
        assert!(!layout.prompt_from_first);
    }

    #[test]
    fn investigation_label_variants_accepted() {
        for label in ["**Investigations:**", "**Investigations**:", "**Investigation:**", "**investigation**:"] {
            let sections = secs(&["scenario", &format!("{} CXR normal", label), "Why?"]);
            let layout = locate(&sections);
            assert_eq!(layout.investigations, "CXR normal", "label {label}");
        }
    }

    #[test]
    fn options_in_first_section_claim_the_prompt() {
        let sections = secs(&[
            "Which drug is first line?\nA) Aspirin\nB) Clopidogrel",
            "**Answer:** A",
        ]);
        let layout = locate(&sections);
        assert!(layout.prompt_from_first);
        assert_eq!(layout.scenario, "");
        assert_eq!(layout.tail_start, 1);
        assert!(layout.prompt.as_deref().unwrap().starts_with("Which drug"));
    }

    #[test]
    fn first_section_override_suppresses_later_reclassification() {
        // Step 3 must not overwrite a prompt claimed by the first section,
        // even when an investigation marker appears later.
        let sections = secs(&[
            "Identify the agent.\nA) Penicillin\nB) Ceftriaxone",
            "**Investigations:** blood cultures positive",
            "this text must not become the prompt",
        ]);
        let layout = locate(&sections);
        assert!(layout.prompt_from_first);
        assert!(layout.prompt.as_deref().unwrap().starts_with("Identify the agent."));
        assert_eq!(layout.investigations, "blood cultures positive");
        assert_eq!(layout.tail_start, 1);
    }

    #[test]
    fn image_only_section_shifts_prompt_forward() {
        let sections = secs(&[
            "A 70-year-old collapses.",
            "**Investigations:** telemetry attached.",
            "[IMAGE: ecg1.png]",
            "Identify the rhythm.\nA) AF\nB) VT",
        ]);
        let layout = locate(&sections);
        assert_eq!(layout.image, "[IMAGE: ecg1.png]");
        assert!(layout.prompt.as_deref().unwrap().starts_with("Identify the rhythm."));
        assert_eq!(layout.tail_start, 4);
    }

    #[test]
    fn markdown_image_reference_recognized() {
        let sections = secs(&["scenario", "![Image](__REF__:cxr.png)", "What does it show?"]);
        let layout = locate(&sections);
        assert_eq!(layout.image, "![Image](__REF__:cxr.png)");
        assert_eq!(layout.prompt.as_deref(), Some("What does it show?"));
    }

    #[test]
    fn embedded_image_keeps_text_after_it() {
        let sections = secs(&[
            "scenario",
            "context that is dropped\n[IMAGE: xray.png]\nWhat does the film show?",
            "A) Effusion",
        ]);
        let layout = locate(&sections);
        assert_eq!(layout.prompt.as_deref(), Some("What does the film show?"));
        assert_eq!(layout.tail_start, 2);
    }

    #[test]
    fn embedded_image_with_nothing_after_keeps_whole_section() {
        let sections = secs(&["scenario", "Look at this film:\n[IMAGE: xray.png]"]);
        let layout = locate(&sections);
        assert_eq!(
            layout.prompt.as_deref(),
            Some("Look at this film:\n[IMAGE: xray.png]")
        );
    }

    #[test]
    fn trailing_investigation_marker_borrows_scenario_paragraph() {
        let sections = secs(&[
            "A long scenario paragraph.",
            "What is the most likely cause?",
            "**Investigations:** CRP 250",
        ]);
        let layout = locate(&sections);
        assert_eq!(layout.scenario, "A long scenario paragraph.");
        assert_eq!(layout.prompt.as_deref(), Some("What is the most likely cause?"));
        assert_eq!(layout.investigations, "CRP 250");
        assert_eq!(layout.tail_start, 3);
    }

    #[test]
    fn image_prompt_recovers_question_from_option_section() {
        let sections = secs(&[
            "scenario",
            "[IMAGE: slide.png]",
            "Which cell type is shown?\nA) Neutrophil\nB) Eosinophil",
        ]);
        let layout = locate(&sections);
        // image-only section with a following section: that section is the
        // prompt, and it still contains the options for the extractor
        assert_eq!(layout.image, "[IMAGE: slide.png]");
        assert!(layout.prompt.as_deref().unwrap().contains("Which cell type"));
    }

    #[test]
    fn image_prompt_falls_back_to_scenario_question() {
        // Prompt resolves to a second bare image; no option section carries
        // usable text, so the scenario's trailing question is used.
        let sections = secs(&[
            "He deteriorates. What is the next step?",
            "[IMAGE: one.png]",
            "[IMAGE: two.png]",
            "A) CT head\nB) LP",
        ]);
        let layout = locate(&sections);
        assert_eq!(layout.prompt.as_deref(), Some("What is the next step?"));
    }

    #[test]
    fn image_prompt_never_synthesized() {
        let sections = secs(&["scenario without question", "[IMAGE: a.png]", "[IMAGE: b.png]"]);
        let layout = locate(&sections);
        assert_eq!(layout.prompt, None);
    }

    #[test]
    fn empty_sections_produce_empty_layout() {
        let layout = locate(&[]);
        assert_eq!(layout.scenario, "");
        assert_eq!(layout.prompt, None);
        assert_eq!(layout.tail_start, 1);
    }

    #[test]
    fn variant_tally_counts_spellings() {
        let content = "**Investigations:** a\n\n**Investigations**: b\n\n**Investigations:** c";
        let variants = label_variants(content);
        assert_eq!(variants.get("**Investigations:**"), Some(&2));
        assert_eq!(variants.get("**Investigations**:"), Some(&1));
    }
}
