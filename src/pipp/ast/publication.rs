//! Publication details: where, when and in which edition the document appears

use super::value::{check_content, debug_field, Scalar};
use super::ConfigNode;
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::token::Position;
use once_cell::sync::Lazy;
use regex::Regex;

static SEMESTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(WS|SS) \d{4}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Publication {
    pub title: Option<Scalar>,
    pub venue: Option<Scalar>,
    pub date: Option<Scalar>,
    pub edition: Option<Scalar>,
    pub institution: Option<Scalar>,
    pub chair: Option<Scalar>,
    pub semester: Option<Scalar>,
    pub position: Position,
}

impl Publication {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl ConfigNode for Publication {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for (name, field) in [
            ("title", &self.title),
            ("venue", &self.venue),
            ("date", &self.date),
            ("edition", &self.edition),
            ("institution", &self.institution),
            ("chair", &self.chair),
            ("semester", &self.semester),
        ] {
            check_content(field, name)?;
        }

        if let Some(date) = &self.date {
            date.parse_date()?;
        }
        if let Some(edition) = &self.edition {
            edition.parse_positive("edition")?;
        }
        if let (Some(chair), None) = (&self.chair, &self.institution) {
            return Err(ConfigError::missing_member(
                "A chair requires the institution it belongs to",
            )
            .at(chair.position));
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        if let Some(semester) = &self.semester {
            if !SEMESTER.is_match(semester.value.trim()) {
                warnings.push(
                    Warning::self_check(
                        Severity::Low,
                        format!(
                            "The semester \"{}\" does not follow the form WS yyyy or SS yyyy",
                            semester.value
                        ),
                    )
                    .at(semester.position),
                );
            }
        }
        if self.date.is_none() {
            warnings.push(
                Warning::missing_member(
                    Severity::Low,
                    "No publication date is given; today's date is used",
                )
                .at(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        let fields: Vec<String> = [
            debug_field("title", &self.title),
            debug_field("venue", &self.venue),
            debug_field("date", &self.date),
            debug_field("edition", &self.edition),
            debug_field("institution", &self.institution),
            debug_field("chair", &self.chair),
            debug_field("semester", &self.semester),
        ]
        .into_iter()
        .flatten()
        .collect();
        format!("Publication({})", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::diagnostics::WarningKind;
    use crate::pipp::error::ConfigErrorKind;

    fn text(value: &str) -> Option<Scalar> {
        Some(Scalar::new(value, Position::new(3, 10)))
    }

    #[test]
    fn test_valid_publication() {
        let publication = Publication {
            venue: text("Darmstadt"),
            date: text("03/06/2023"),
            edition: text("2"),
            institution: text("TU Darmstadt"),
            chair: text("Software Engineering"),
            semester: text("SS 2023"),
            ..Publication::default()
        };
        assert!(publication.validate_errors().is_ok());
        let mut warnings = WarningQueue::new();
        publication.validate_warnings(&mut warnings);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_chair_without_institution() {
        let publication = Publication {
            chair: text("Software Engineering"),
            ..Publication::default()
        };
        assert_eq!(
            publication.validate_errors().unwrap_err().kind,
            ConfigErrorKind::MissingMember
        );
    }

    #[test]
    fn test_malformed_values() {
        let bad_date = Publication {
            date: text("June 3rd"),
            ..Publication::default()
        };
        assert_eq!(
            bad_date.validate_errors().unwrap_err().kind,
            ConfigErrorKind::IncorrectFormat
        );
        let bad_edition = Publication {
            edition: text("second"),
            ..Publication::default()
        };
        assert_eq!(
            bad_edition.validate_errors().unwrap_err().kind,
            ConfigErrorKind::IncorrectFormat
        );
    }

    #[test]
    fn test_semester_and_date_warnings() {
        let publication = Publication {
            semester: text("Summer 23"),
            ..Publication::default()
        };
        let mut warnings = WarningQueue::new();
        publication.validate_warnings(&mut warnings);
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::SelfCheck, WarningKind::MissingMember]);
    }
}
