//! Scalar values and the shared checks applied to them

use crate::pipp::error::ConfigError;
use crate::pipp::style::InvalidValue;
use crate::pipp::token::Position;
use chrono::NaiveDate;
use std::str::FromStr;

/// Date format accepted by `date` and `accessed`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A text value together with where it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub value: String,
    pub position: Position,
}

impl Scalar {
    pub fn new(value: impl Into<String>, position: Position) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Blank texts are never valid content
    pub fn require_content(&self, field: &str) -> Result<(), ConfigError> {
        if self.is_blank() {
            return Err(ConfigError::missing_member(format!(
                "A text component cannot be blank ({field})"
            ))
            .at(self.position));
        }
        Ok(())
    }

    /// Parse into a style domain type, reporting the value's position on failure
    pub fn parse<T>(&self) -> Result<T, ConfigError>
    where
        T: FromStr<Err = InvalidValue>,
    {
        self.value
            .parse::<T>()
            .map_err(|error| ConfigError::incorrect_format(error.to_string()).at(self.position))
    }

    pub fn parse_positive(&self, field: &str) -> Result<u32, ConfigError> {
        match self.value.trim().parse::<u32>() {
            Ok(number) if number > 0 => Ok(number),
            _ => Err(ConfigError::incorrect_format(format!(
                "\"{}\" is not a valid {field} (a positive whole number)",
                self.value
            ))
            .at(self.position)),
        }
    }

    /// Line spacing: a positive multiple of the line height
    pub fn parse_spacing(&self) -> Result<f32, ConfigError> {
        match self.value.trim().parse::<f32>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
            _ => Err(ConfigError::incorrect_format(format!(
                "\"{}\" is not a valid line spacing (a positive number)",
                self.value
            ))
            .at(self.position)),
        }
    }

    /// A `dd/mm/yyyy` date, or `None` for an explicitly undated document
    pub fn parse_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        let trimmed = self.value.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                ConfigError::incorrect_format(format!(
                    "\"{}\" is not a valid date (dd/mm/yyyy or None)",
                    self.value
                ))
                .at(self.position)
            })
    }
}

/// Check an optional field's content when it is present
pub(crate) fn check_content(field: &Option<Scalar>, name: &str) -> Result<(), ConfigError> {
    match field {
        Some(scalar) => scalar.require_content(name),
        None => Ok(()),
    }
}

/// One-line debug rendering of an optional field
pub(crate) fn debug_field(name: &str, field: &Option<Scalar>) -> Option<String> {
    field
        .as_ref()
        .map(|scalar| format!("{name}: {:?}", scalar.value))
}
