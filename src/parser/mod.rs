pub mod blocks;
pub mod extract;
pub mod locate;
pub mod recover;
pub mod sections;
pub mod specialty;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One parsed question, built in a single pass and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub title: String,
    pub specialty: String,
    pub scenario: String,
    pub investigations: String,
    pub image: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
    pub explanations: Vec<String>,
}

/// Parse a quiz document into question records, in document order.
///
/// Total over arbitrary input: malformed blocks are skipped, and a document
/// that yields nothing under the primary `### <n>.` convention gets one
/// recovery pass over alternate conventions. An empty result is a reported
/// outcome, not an error.
pub fn parse(text: &str, source_name: &str) -> Vec<QuestionRecord> {
    let content = text.trim();
    let records = parse_primary(content);
    if records.is_empty() {
        debug!("{}: primary pass found no questions", source_name);
        return recover::reparse(content, source_name);
    }
    records
}

/// Whole-document pass under the primary heading convention.
pub(crate) fn parse_primary(content: &str) -> Vec<QuestionRecord> {
    let index = specialty::SpecialtyIndex::build(content);
    let mut records = Vec::new();

    for block in blocks::segment(content) {
        let specialty = index.resolve(block.start).to_string();
        match parse_block(&block, specialty) {
            Some(record) => records.push(record),
            None => warn!("skipping unparseable block at offset {}", block.start),
        }
    }

    records
}

fn parse_block(block: &blocks::QuestionBlock, specialty: String) -> Option<QuestionRecord> {
    let header = blocks::split_header(&block.text)?;
    let sections = sections::split(&header.body);
    let layout = locate::locate(&sections);
    let extracted = extract::extract_all(&layout, &sections);

    Some(QuestionRecord {
        id: header.id,
        title: header.title,
        specialty,
        scenario: layout.scenario,
        investigations: layout.investigations,
        image: layout.image,
        prompt: extracted.prompt,
        options: extracted.options,
        correct_answer: extracted.correct_answer,
        explanations: extracted.explanations,
    })
}

// ── Tests ──
