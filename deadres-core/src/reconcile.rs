//! Declared-minus-referenced reconciliation and report rendering.
//!
//! Performance characteristics:
//! - Reconciliation: O(|R| log |D|) removals over an owned copy of the map
//! - Rendering: O(|U|), sorted by category then name

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::category::IGNORED_CATEGORY;
use crate::declarations::DeclarationMap;
use crate::identifier::{ReferenceSet, ResourceId};

/// Unused resource names grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnusedReport {
    total: usize,
    unused: BTreeMap<String, BTreeSet<String>>,
}

impl UnusedReport {
    /// Number of unused identifiers across all categories.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Unused names of one category, if any.
    pub fn names(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.unused.get(category)
    }

    /// All unused identifiers, category by category, names sorted.
    pub fn iter(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.unused
            .iter()
            .flat_map(|(category, names)| names.iter().map(move |n| ResourceId::new(category, n)))
    }

    /// Drop every identifier for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(&ResourceId) -> bool) {
        for (category, names) in self.unused.iter_mut() {
            names.retain(|name| keep(&ResourceId::new(category.as_str(), name.as_str())));
        }
        self.unused.retain(|_, names| !names.is_empty());
        self.total = self.unused.values().map(BTreeSet::len).sum();
    }
}

/// Compute the declared identifiers that nothing references.
///
/// The `id` category is always dropped. References to categories that were
/// never declared are ignored.
pub fn find_unused(declared: &DeclarationMap, referenced: &ReferenceSet) -> UnusedReport {
    let mut unused = declared.clone().into_inner();
    unused.remove(IGNORED_CATEGORY);

    for id in referenced {
        if let Some(names) = unused.get_mut(id.category()) {
            names.remove(id.name());
        }
    }

    unused.retain(|_, names| !names.is_empty());
    let total = unused.values().map(BTreeSet::len).sum();

    UnusedReport { total, unused }
}

/// Render the report as the plain-text block printed to users.
pub fn render_plain(report: &UnusedReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("Found 0 unused resources\n");
        return out;
    }

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Found {} unused resources", report.total());
    out.push_str(
        "The following constants in R.java are not used by your project \
         and the corresponding resource files can be removed:\n",
    );
    for id in report.iter() {
        let _ = writeln!(out, "{}", id);
    }
    out
}

impl fmt::Display for UnusedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_plain(self))
    }
}
