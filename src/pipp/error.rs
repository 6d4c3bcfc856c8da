//! Fatal errors
//!
//! Every fatal condition of a compilation run ends up as one [PippError] returned to the
//! caller. Validation failures are [ConfigError]s: one of four kinds, a message naming the
//! violated rule, and the position of the offending node when the tree knows it.

use super::parsing::ParseErrors;
use super::scanner::LexError;
use super::style::StructureType;
use super::token::Position;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// A required section is absent
    MissingConfiguration,
    /// A value or combination the language forbids
    IllegalConfiguration,
    /// A required field of a section is absent or blank
    MissingMember,
    /// A value has the wrong shape
    IncorrectFormat,
}

impl ConfigErrorKind {
    pub fn code(&self) -> u8 {
        match self {
            ConfigErrorKind::MissingConfiguration => 30,
            ConfigErrorKind::IllegalConfiguration => 31,
            ConfigErrorKind::MissingMember => 32,
            ConfigErrorKind::IncorrectFormat => 33,
        }
    }
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErrorKind::MissingConfiguration => write!(f, "missing configuration"),
            ConfigErrorKind::IllegalConfiguration => write!(f, "illegal configuration"),
            ConfigErrorKind::MissingMember => write!(f, "missing member"),
            ConfigErrorKind::IncorrectFormat => write!(f, "incorrect format"),
        }
    }
}

fn location(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} [E{}]: {}{}", .kind, .kind.code(), .message, location(.position))]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn missing_configuration(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::MissingConfiguration, message)
    }

    pub fn illegal_configuration(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::IllegalConfiguration, message)
    }

    pub fn missing_member(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::MissingMember, message)
    }

    pub fn incorrect_format(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::IncorrectFormat, message)
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

#[derive(Debug, Error)]
pub enum PippError {
    #[error("specification version \"{version}\" is not supported (supported: {supported}){}", location(.position))]
    UnsupportedVersion {
        version: String,
        supported: String,
        position: Option<Position>,
    },

    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    #[error("{0}")]
    Parse(ParseErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("structure error: the {section} section must come before the {anchor} section")]
    StructureOrder {
        section: StructureType,
        anchor: StructureType,
    },

    #[error("unknown style guide \"{name}\" (known styles: {known}){}", location(.position))]
    UnknownStyle {
        name: String,
        known: String,
        position: Option<Position>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PippError {
    /// Source position of the failure, when one is known
    pub fn position(&self) -> Option<Position> {
        match self {
            PippError::UnsupportedVersion { position, .. }
            | PippError::UnknownStyle { position, .. } => *position,
            PippError::Lexical(error) => Some(error.position()),
            PippError::Parse(errors) => errors.first().map(|error| error.position),
            PippError::Config(error) => error.position,
            PippError::StructureOrder { .. } | PippError::Io { .. } => None,
        }
    }
}

impl From<ParseErrors> for PippError {
    fn from(errors: ParseErrors) -> Self {
        PippError::Parse(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::missing_member("A lastname is required when a firstname is given")
            .at(Position::new(4, 2));
        assert_eq!(
            error.to_string(),
            "missing member [E32]: A lastname is required when a firstname is given at 4:2"
        );
        let unplaced = ConfigError::missing_configuration("An author is required");
        assert_eq!(
            unplaced.to_string(),
            "missing configuration [E30]: An author is required"
        );
    }

    #[test]
    fn test_structure_order_display() {
        let error = PippError::StructureOrder {
            section: StructureType::Abstract,
            anchor: StructureType::Endnotes,
        };
        assert_eq!(
            error.to_string(),
            "structure error: the abstract section must come before the endnotes section"
        );
    }

    #[test]
    fn test_lexical_error_converts() {
        let lex = LexError::UnexpectedCharacter {
            character: '%',
            position: Position::new(2, 3),
        };
        let error = PippError::from(lex);
        assert_eq!(error.position(), Some(Position::new(2, 3)));
        assert_eq!(error.to_string(), "lexical error: unexpected character '%' at 2:3");
    }
}
