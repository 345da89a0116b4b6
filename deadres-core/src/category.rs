//! The resource categories both extractors recognize.
//!
//! One ordered set is configured per run and handed to the source and markup
//! extractors alike. Order matters for markup prefix matching: the first
//! category whose `@<category>/` prefix matches wins.

use serde::Deserialize;

/// Category whose identifiers are never reported.
///
/// `R.id.*` values are view ids assigned by the build, not resources that can
/// be deleted.
pub const IGNORED_CATEGORY: &str = "id";

/// Default recognized categories, in markup prefix order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "drawable",
    "string",
    "color",
    "style",
    "array",
    "anim",
    "styleable",
    "raw",
    "menu",
    "xml",
    "attr",
    "layout",
];

/// Ordered, duplicate-free list of recognized resource categories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct CategorySet {
    categories: Vec<String>,
    prefixes: Vec<String>,
}

impl CategorySet {
    /// Build a set from category names. Later duplicates are dropped.
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into();
            let category = category.trim();
            if !category.is_empty() && !unique.iter().any(|c| c == category) {
                unique.push(category.to_string());
            }
        }
        let prefixes = unique.iter().map(|c| format!("@{}/", c)).collect();
        Self {
            categories: unique,
            prefixes,
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Pairs of `(category, "@category/")` in configured order.
    pub fn markup_prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.prefixes.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES.iter().copied())
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(categories: Vec<String>) -> Self {
        Self::new(categories)
    }
}
