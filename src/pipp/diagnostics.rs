//! Non-fatal diagnostics
//!
//!     Warnings never change control flow. Validation and processing push them into the
//!     [WarningQueue] of the current run, which the caller owns and hands down explicitly;
//!     there is no process-wide queue, so separate compilations never see each other's
//!     warnings.
//!
//!     Severities order as LOW < HIGH < CRITICAL. A CRITICAL warning is still a warning.

use super::token::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Values that contradict each other
    Inconsistency,
    /// Something optional but expected is absent
    MissingMember,
    /// A legal but improbable value
    Unlikeliness,
    /// The author should double-check a choice
    SelfCheck,
}

impl WarningKind {
    /// Leading digit of the warning code
    pub fn code_prefix(&self) -> u8 {
        match self {
            WarningKind::Inconsistency => 1,
            WarningKind::MissingMember => 2,
            WarningKind::Unlikeliness => 3,
            WarningKind::SelfCheck => 4,
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Inconsistency => write!(f, "inconsistency"),
            WarningKind::MissingMember => write!(f, "missing member"),
            WarningKind::Unlikeliness => write!(f, "unlikeliness"),
            WarningKind::SelfCheck => write!(f, "self check"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip)]
    pub position: Option<Position>,
}

impl Warning {
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            position: None,
        }
    }

    pub fn inconsistency(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(WarningKind::Inconsistency, severity, message)
    }

    pub fn missing_member(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(WarningKind::MissingMember, severity, message)
    }

    pub fn unlikeliness(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(WarningKind::Unlikeliness, severity, message)
    }

    pub fn self_check(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(WarningKind::SelfCheck, severity, message)
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn at_opt(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): {}", self.severity, self.message)?;
        if let Some(position) = self.position {
            write!(f, " at {}", position)?;
        }
        Ok(())
    }
}

/// Warnings of one compilation run, in the order they were raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningQueue {
    warnings: Vec<Warning>,
}

impl WarningQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        log::debug!("warning raised: {}", warning);
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }

    /// Warnings at or above a severity
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(move |warning| warning.severity >= severity)
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|warning| warning.severity).max()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.warnings
    }
}

impl<'a> IntoIterator for &'a WarningQueue {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for WarningQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "{}", warning)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = Warning::unlikeliness(Severity::High, "Font size 120 is unusually large");
        assert_eq!(warning.to_string(), "(HIGH): Font size 120 is unusually large");
        let located = warning.at(Position::new(3, 9));
        assert_eq!(
            located.to_string(),
            "(HIGH): Font size 120 is unusually large at 3:9"
        );
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Low < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_queue_filters_and_reports() {
        let mut queue = WarningQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.highest_severity(), None);

        queue.push(Warning::self_check(Severity::Low, "check the semester"));
        queue.push(Warning::unlikeliness(Severity::Critical, "duplicate author"));
        queue.push(Warning::inconsistency(Severity::High, "mixed roles"));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.at_least(Severity::High).count(), 2);
        assert_eq!(queue.highest_severity(), Some(Severity::Critical));
        assert_eq!(
            queue.to_string(),
            "(LOW): check the semester\n(CRITICAL): duplicate author\n(HIGH): mixed roles\n"
        );
    }

    #[test]
    fn test_code_prefixes() {
        assert_eq!(WarningKind::Inconsistency.code_prefix(), 1);
        assert_eq!(WarningKind::SelfCheck.code_prefix(), 4);
    }
}
