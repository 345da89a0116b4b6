//! Resource identifier value type.

use std::collections::HashSet;
use std::fmt;

/// Every resource reference found during a scan. Duplicates collapse.
pub type ReferenceSet = HashSet<ResourceId>;

/// Namespace every generated resource constant lives under.
pub const NAMESPACE: &str = "R";

/// A fully-qualified resource reference such as `R.string.app_name`.
///
/// Equality is structural over category and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    category: String,
    name: String,
}

impl ResourceId {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Parse a qualified `<namespace>.<category>.<name>` string.
    ///
    /// Everything after the second dot is the name, so nested names such as
    /// `R.string.a.b` keep `a.b`. Returns `None` when the category or name is
    /// missing or empty.
    pub fn parse_qualified(qualified: &str) -> Option<Self> {
        let mut parts = qualified.splitn(3, '.');
        let _namespace = parts.next()?;
        let category = parts.next().filter(|c| !c.is_empty())?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        Some(Self::new(category, name))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", NAMESPACE, self.category, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let id = ResourceId::parse_qualified("R.string.app_name").unwrap();
        assert_eq!(id.category(), "string");
        assert_eq!(id.name(), "app_name");
        assert_eq!(id.to_string(), "R.string.app_name");
    }

    #[test]
    fn test_parse_keeps_dotted_name() {
        let id = ResourceId::parse_qualified("R.style.Theme.Light").unwrap();
        assert_eq!(id.category(), "style");
        assert_eq!(id.name(), "Theme.Light");
    }

    #[test]
    fn test_parse_rejects_short_candidates() {
        assert!(ResourceId::parse_qualified("R.string").is_none());
        assert!(ResourceId::parse_qualified("R.string.").is_none());
        assert!(ResourceId::parse_qualified("R..x").is_none());
        assert!(ResourceId::parse_qualified("R").is_none());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            ResourceId::new("drawable", "icon"),
            ResourceId::parse_qualified("R.drawable.icon").unwrap()
        );
        assert_ne!(ResourceId::new("drawable", "icon"), ResourceId::new("string", "icon"));
    }
}
