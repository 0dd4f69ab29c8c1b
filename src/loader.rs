use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::parser::{self, locate, QuestionRecord};

/// Process-wide parse cache keyed by content hash. Content-addressed, so a
/// changed file simply misses; stale entries are never reachable again.
static CACHE: LazyLock<Mutex<HashMap<String, Arc<Vec<QuestionRecord>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub struct QuizFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

pub struct LoadedQuiz {
    pub name: String,
    pub hash: String,
    pub records: Arc<Vec<QuestionRecord>>,
}

/// List quiz markdown files in a directory, sorted by name.
pub fn discover(dir: &Path) -> Result<Vec<QuizFile>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        files.push(QuizFile {
            name: quiz_name(&path),
            size: entry.metadata()?.len(),
            path,
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Read and parse one quiz file, going through the content-hash cache.
/// Decoding problems surface here; the parser itself never fails.
pub fn load(path: &Path) -> Result<LoadedQuiz> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let name = quiz_name(path);
    let hash = content_hash(&content);

    if let Some(records) = CACHE.lock().unwrap().get(&hash) {
        debug!("{}: cache hit ({} questions)", name, records.len());
        return Ok(LoadedQuiz {
            name,
            hash,
            records: Arc::clone(records),
        });
    }

    let variants = locate::label_variants(&content);
    if !variants.is_empty() {
        debug!("{}: investigation label spellings: {:?}", name, variants);
    }

    let records = Arc::new(parser::parse(&content, &name));
    CACHE
        .lock()
        .unwrap()
        .insert(hash.clone(), Arc::clone(&records));
    Ok(LoadedQuiz { name, hash, records })
}

pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn quiz_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("quiz")
        .to_string()
}

// ── Tests ──
