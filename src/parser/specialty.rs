use std::sync::LazyLock;

use regex::Regex;

static SPECIALTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)$").unwrap());

/// Position→label index over `## ` specialty headers. Every byte range has
/// an owner: an implicit `(0, "Uncategorized")` marker is always present.
pub struct SpecialtyIndex {
    markers: Vec<(usize, String)>,
}

impl SpecialtyIndex {
    pub fn build(content: &str) -> Self {
        let mut markers = vec![(0, "Uncategorized".to_string())];
        for caps in SPECIALTY_RE.captures_iter(content) {
            let m = caps.get(0).unwrap();
            markers.push((m.start(), caps[1].trim().to_string()));
        }
        markers.sort_by_key(|(offset, _)| *offset);
        Self { markers }
    }

    /// Label of the last marker at or before `offset`.
    pub fn resolve(&self, offset: usize) -> &str {
        let idx = self.markers.partition_point(|(start, _)| *start <= offset);
        // idx >= 1: the implicit marker sits at offset 0
        &self.markers[idx - 1].1
    }
}

// ── Tests ──
