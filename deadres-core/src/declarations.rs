//! Parsing of the generated `R.java` declarations file.
//!
//! The file is line oriented: each `public static final class <category> {`
//! opens a category and each following `public static final int <name> = ...;`
//! declares a name in it. Only these two line shapes matter; everything else
//! is skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{DeadresError, DeadresResult, IoResultExt};

const CLASS_MARKER: &str = "public static final class";
const INT_MARKER: &str = "public static final int";

/// Declared resource names keyed by category.
///
/// Backed by ordered collections so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationMap {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl DeclarationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a category exists, possibly empty.
    pub fn open_category(&mut self, category: impl Into<String>) {
        self.categories.entry(category.into()).or_default();
    }

    /// Add a name to a category, creating the category if needed.
    pub fn declare(&mut self, category: impl Into<String>, name: impl Into<String>) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(name.into());
    }

    /// Declared names for a category. Absent categories have no declarations.
    pub fn names(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|names| names.contains(name))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of declared names across all categories.
    pub fn declared_count(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, BTreeSet<String>> {
        self.categories
    }
}

/// Read and parse a declarations file.
///
/// A missing or unreadable file is an error; so is any malformed
/// declaration (see [`parse_declarations_str`]).
pub fn parse_declarations(path: &Path) -> DeadresResult<DeclarationMap> {
    let content = fs::read_to_string(path).with_path(path)?;
    let map = parse_declarations_str(path, &content)?;
    debug!(
        path = %path.display(),
        categories = map.categories.len(),
        declared = map.declared_count(),
        "parsed declarations"
    );
    Ok(map)
}

/// Parse declarations file content. `path` is only used for error messages.
pub fn parse_declarations_str(path: &Path, content: &str) -> DeadresResult<DeclarationMap> {
    let mut map = DeclarationMap::new();
    let mut current: Option<String> = None;

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(CLASS_MARKER) {
            let category = rest
                .split_once('{')
                .map(|(name, _)| name.trim())
                .ok_or_else(|| {
                    DeadresError::malformed(path, line_no, "class declaration without '{'")
                })?;
            if category.is_empty() {
                return Err(DeadresError::malformed(path, line_no, "class without a name"));
            }
            map.open_category(category);
            current = Some(category.to_string());
        } else if let Some(rest) = trimmed.strip_prefix(INT_MARKER) {
            let Some(category) = current.as_deref() else {
                return Err(DeadresError::malformed(
                    path,
                    line_no,
                    "int declaration before any resource class",
                ));
            };
            let name = declared_name(rest).ok_or_else(|| {
                DeadresError::malformed(path, line_no, "int declaration without a name or '='")
            })?;
            map.declare(category, name);
        }
    }

    Ok(map)
}

/// Extract the name from the text following the `int` marker.
///
/// Handles both `int name = 0x7f..;` and the styleable `int[] Name = { .. };`.
fn declared_name(rest: &str) -> Option<&str> {
    let (head, _) = rest.split_once('=')?;
    let head = head.trim_start();
    let head = head.strip_prefix("[]").unwrap_or(head);
    let name = head.trim();
    (!name.is_empty()).then_some(name)
}
