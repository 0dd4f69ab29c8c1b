use std::sync::LazyLock;

use regex::Regex;

static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"###\s*\d+\.").unwrap());
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A###\s*(\d+)\.\s*(.*?)\n(.*)\z").unwrap());

/// One question's span of source text, from a numbered `###` heading up to
/// the next one or end of document.
#[derive(Debug, Clone)]
pub struct QuestionBlock {
    pub start: usize,
    pub text: String,
}

pub struct BlockHeader {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Locate all question blocks. Text before the first heading is dropped;
/// blocks are non-overlapping and cover everything from their heading to the
/// next heading or end of document.
pub fn segment(content: &str) -> Vec<QuestionBlock> {
    let starts: Vec<usize> = BLOCK_START_RE.find_iter(content).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            QuestionBlock {
                start,
                text: content[start..end].to_string(),
            }
        })
        .collect()
}

/// Split the heading line off a block. A heading with no body line after it
/// is unparseable and yields `None`.
pub fn split_header(block: &str) -> Option<BlockHeader> {
    let caps = HEADER_RE.captures(block.trim())?;
    let id = caps[1].parse::<i64>().ok()?;
    Some(BlockHeader {
        id,
        title: caps[2].trim().to_string(),
        body: caps[3].to_string(),
    })
}

// ── Tests ──
