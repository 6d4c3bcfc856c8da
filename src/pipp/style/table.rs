//! Registry of style guide names
//!
//! Lookups are case-insensitive and ignore surrounding whitespace. The registry is
//! fixed at construction; an unknown name is reported to the caller as a fatal
//! resolution error rather than falling back to a default.

use super::guide::StyleGuide;
use crate::pipp::error::PippError;
use crate::pipp::token::Position;
use std::collections::HashMap;

pub struct StyleTable {
    guides: HashMap<String, StyleGuide>,
}

impl StyleTable {
    /// Create an empty table
    pub fn new() -> Self {
        StyleTable {
            guides: HashMap::new(),
        }
    }

    /// Register a guide under its own name. Re-registering replaces the entry.
    pub fn register(&mut self, guide: StyleGuide) {
        self.guides.insert(guide.name().to_lowercase(), guide);
    }

    pub fn has(&self, name: &str) -> bool {
        self.name_to_style_guide(name).is_some()
    }

    pub fn name_to_style_guide(&self, name: &str) -> Option<StyleGuide> {
        self.guides.get(&name.trim().to_lowercase()).copied()
    }

    /// Resolve a declared style name, failing on unknown names
    pub fn resolve(&self, name: &str, position: Option<Position>) -> Result<StyleGuide, PippError> {
        self.name_to_style_guide(name)
            .ok_or_else(|| PippError::UnknownStyle {
                name: name.to_string(),
                known: self.list_styles().join(", "),
                position,
            })
    }

    /// Registered guide names in display spelling (sorted)
    pub fn list_styles(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .guides
            .values()
            .map(|guide| guide.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Create a table with every shipped guide
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for guide in StyleGuide::ALL {
            table.register(guide);
        }
        table
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("MLA9", StyleGuide::Mla9)]
    #[case("mla9", StyleGuide::Mla9)]
    #[case(" Mla9 ", StyleGuide::Mla9)]
    #[case("pipp", StyleGuide::Pipp)]
    #[case("PIPP", StyleGuide::Pipp)]
    fn test_case_insensitive_lookup(#[case] name: &str, #[case] expected: StyleGuide) {
        let table = StyleTable::default();
        assert_eq!(table.name_to_style_guide(name), Some(expected));
    }

    #[test]
    fn test_empty_table() {
        let table = StyleTable::new();
        assert!(!table.has("mla9"));
        assert!(table.list_styles().is_empty());
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let table = StyleTable::default();
        let error = table.resolve("APA7", Some(Position::new(4, 11))).unwrap_err();
        assert_eq!(error.position(), Some(Position::new(4, 11)));
        insta::assert_snapshot!(
            error.to_string(),
            @r#"unknown style guide "APA7" (known styles: MLA9, Pipp) at 4:11"#
        );
    }
}
