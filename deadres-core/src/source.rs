//! Textual `R.<category>.<name>` reference extraction from program source.
//!
//! This is a line scanner, not a parser. A candidate starts at every `R.` and
//! ends at the nearer of the next `)` or `,` (or end of line). Lines whose
//! trimmed form starts with `//` are skipped; block comments and trailing
//! comments are not recognized, so references inside them still count.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::category::CategorySet;
use crate::error::{DeadresResult, IoResultExt};
use crate::identifier::{ReferenceSet, ResourceId};

const LINE_COMMENT: &str = "//";
const REFERENCE_START: &str = "R.";

/// Extract references from every file, skipping (and logging) unreadable ones.
pub fn extract_source_references(files: &[PathBuf], categories: &CategorySet) -> ReferenceSet {
    let mut refs = ReferenceSet::new();
    for path in files {
        match extract_source_file(path, categories) {
            Ok(found) => refs.extend(found),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable source file"),
        }
    }
    refs
}

/// Extract references from a single source file.
///
/// Invalid UTF-8 is replaced rather than rejected; legacy encodings still
/// scan fine for ASCII identifiers.
pub fn extract_source_file(path: &Path, categories: &CategorySet) -> DeadresResult<ReferenceSet> {
    let bytes = fs::read(path).with_path(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(extract_from_source_str(&content, categories))
}

pub fn extract_from_source_str(content: &str, categories: &CategorySet) -> ReferenceSet {
    let mut refs = ReferenceSet::new();
    for line in content.lines() {
        extract_from_source_line(line, categories, &mut refs);
    }
    refs
}

/// Scan one line, inserting every recognized reference into `out`.
pub fn extract_from_source_line(line: &str, categories: &CategorySet, out: &mut ReferenceSet) {
    if line.trim_start().starts_with(LINE_COMMENT) {
        return;
    }

    let mut from = 0;
    while let Some(offset) = line[from..].find(REFERENCE_START) {
        let start = from + offset;
        let end = candidate_end(line, start);
        let candidate = line[start..end].trim_end();

        match ResourceId::parse_qualified(candidate) {
            Some(id) if categories.contains(id.category()) => {
                out.insert(id);
            }
            Some(_) => {}
            None => debug!(line, candidate, "skipping malformed resource reference"),
        }

        from = end;
    }
}

/// Nearer of the next `)` or `,` at or after `start`, else end of line.
fn candidate_end(line: &str, start: usize) -> usize {
    let rest = &line[start..];
    let close = rest.find(')');
    let comma = rest.find(',');
    match (close, comma) {
        (Some(a), Some(b)) => start + a.min(b),
        (Some(a), None) | (None, Some(a)) => start + a,
        (None, None) => line.len(),
    }
}
