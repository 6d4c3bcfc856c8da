//! Document title
//!
//! A title is an ordered list of fragments. A fragment is plain text or a citation of a
//! larger work whose title is nested inside this one (rendered in italics).

use super::value::Scalar;
use super::{render_children, ConfigNode};
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::token::Position;

/// Reference to another work inside a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub work: Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitedText {
    Plain(Scalar),
    Cited(Citation),
}

impl CitedText {
    pub fn scalar(&self) -> &Scalar {
        match self {
            CitedText::Plain(text) => text,
            CitedText::Cited(citation) => &citation.work,
        }
    }
}

impl ConfigNode for CitedText {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        self.scalar().require_content("title")
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        match self {
            CitedText::Plain(text) => format!("Plain({:?})", text.value),
            CitedText::Cited(citation) => format!("Cited({:?})", citation.work.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Title {
    pub fragments: Vec<CitedText>,
    pub position: Option<Position>,
}

impl Title {
    /// The title as one plain string
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|fragment| fragment.scalar().value.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ConfigNode for Title {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for fragment in &self.fragments {
            fragment.validate_errors()?;
        }
        if self.fragments.is_empty() {
            return Err(
                ConfigError::missing_configuration("A title is required").at_opt(self.position)
            );
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        if self.text().ends_with('.') {
            warnings.push(
                Warning::unlikeliness(Severity::Low, "Titles rarely end with a full stop")
                    .at_opt(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        render_children("Title", self.fragments.iter().map(|f| f.render_debug()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &str) -> CitedText {
        CitedText::Plain(Scalar::new(value, Position::new(1, 7)))
    }

    #[test]
    fn test_title_text_joins_fragments() {
        let title = Title {
            fragments: vec![
                plain("Reading"),
                CitedText::Cited(Citation {
                    work: Scalar::new("The Raven", Position::new(1, 20)),
                }),
            ],
            position: Some(Position::new(1, 1)),
        };
        assert_eq!(title.text(), "Reading The Raven");
        assert!(title.validate_errors().is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        assert!(Title::default().validate_errors().is_err());
    }

    #[test]
    fn test_full_stop_warning() {
        let title = Title {
            fragments: vec![plain("A Title.")],
            position: None,
        };
        let mut warnings = WarningQueue::new();
        title.validate_warnings(&mut warnings);
        assert_eq!(warnings.len(), 1);
    }
}
