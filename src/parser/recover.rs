use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::QuestionRecord;

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(\d+\.\s+)").unwrap());
static Q_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Q(\d+)[.:]\s*").unwrap());
static QUESTION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Question\s+(\d+)").unwrap());

/// Last resort for documents that use a different question convention.
/// Each rewrite converts matching lines into the primary `### <n>.` heading
/// form and the whole pipeline re-runs against the rewritten text; the first
/// convention producing any questions wins. The original text is never
/// touched.
pub fn reparse(content: &str, source_name: &str) -> Vec<QuestionRecord> {
    let rewrites: [(&str, fn(&str) -> Option<String>); 3] = [
        ("numbered-list", rewrite_numbered),
        ("Q-prefix", rewrite_q_prefix),
        ("Question-prefix", rewrite_question_prefix),
    ];

    for (convention, rewrite) in rewrites {
        let Some(rewritten) = rewrite(content) else {
            continue;
        };
        debug!("{}: retrying with {} convention", source_name, convention);
        let records = super::parse_primary(&rewritten);
        if !records.is_empty() {
            info!(
                "{}: recovered {} questions via {} convention",
                source_name,
                records.len(),
                convention
            );
            return records;
        }
    }

    Vec::new()
}

fn rewrite_numbered(content: &str) -> Option<String> {
    if !NUMBERED_RE.is_match(content) {
        return None;
    }
    Some(NUMBERED_RE.replace_all(content, "### ${1}").into_owned())
}

fn rewrite_q_prefix(content: &str) -> Option<String> {
    if !Q_PREFIX_RE.is_match(content) {
        return None;
    }
    Some(Q_PREFIX_RE.replace_all(content, "### ${1}. ").into_owned())
}

fn rewrite_question_prefix(content: &str) -> Option<String> {
    if !QUESTION_PREFIX_RE.is_match(content) {
        return None;
    }
    Some(QUESTION_PREFIX_RE.replace_all(content, "### ${1}.").into_owned())
}

// ── Tests ──
