//! Authors and assessors
//!
//! Both are people with the same shape: either a single `name`, or a `firstname` and a
//! `lastname`, plus an optional role and institution. The collections differ in their
//! cross-member checks.

use super::value::{check_content, debug_field, Scalar};
use super::{render_children, ConfigNode};
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::token::Position;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Person {
    pub name: Option<Scalar>,
    pub firstname: Option<Scalar>,
    pub lastname: Option<Scalar>,
    pub role: Option<Scalar>,
    pub institution: Option<Scalar>,
    pub position: Position,
}

pub type Author = Person;
pub type Assessor = Person;

impl Person {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// A person given by a single name text
    pub fn named(name: Scalar) -> Self {
        Self {
            position: name.position,
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        match (&self.name, &self.firstname, &self.lastname) {
            (Some(name), _, _) => name.value.trim().to_string(),
            (None, Some(first), Some(last)) => {
                format!("{} {}", first.value.trim(), last.value.trim())
            }
            (None, Some(only), None) | (None, None, Some(only)) => only.value.trim().to_string(),
            (None, None, None) => String::new(),
        }
    }
}

impl ConfigNode for Person {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_content(&self.name, "name")?;
        check_content(&self.firstname, "firstname")?;
        check_content(&self.lastname, "lastname")?;
        check_content(&self.role, "role")?;
        check_content(&self.institution, "institution")?;

        match (&self.name, &self.firstname, &self.lastname) {
            (Some(_), None, None) | (None, Some(_), Some(_)) => Ok(()),
            (Some(_), _, _) => Err(ConfigError::illegal_configuration(
                "Use either name or firstname and lastname, not both",
            )
            .at(self.position)),
            (None, Some(_), None) => Err(ConfigError::missing_member(
                "A lastname is required when a firstname is given",
            )
            .at(self.position)),
            (None, None, Some(_)) => Err(ConfigError::missing_member(
                "A firstname is required when a lastname is given",
            )
            .at(self.position)),
            (None, None, None) => {
                Err(ConfigError::missing_member("A person requires a name").at(self.position))
            }
        }
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        let fields: Vec<String> = [
            debug_field("name", &self.name),
            debug_field("firstname", &self.firstname),
            debug_field("lastname", &self.lastname),
            debug_field("role", &self.role),
            debug_field("institution", &self.institution),
        ]
        .into_iter()
        .flatten()
        .collect();
        format!("Person({})", fields.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Authors {
    pub members: Vec<Author>,
    pub position: Option<Position>,
}

impl ConfigNode for Authors {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for author in &self.members {
            author.validate_errors()?;
        }
        if self.members.is_empty() {
            return Err(ConfigError::missing_configuration("At least one author is required")
                .at_opt(self.position));
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        for author in &self.members {
            author.validate_warnings(warnings);
        }
        let mut seen = HashSet::new();
        for author in &self.members {
            let name = author.full_name().to_lowercase();
            if !seen.insert(name) {
                warnings.push(
                    Warning::unlikeliness(
                        Severity::Critical,
                        format!("The author \"{}\" is listed more than once", author.full_name()),
                    )
                    .at(author.position),
                );
            }
        }
    }

    fn render_debug(&self) -> String {
        render_children("Authors", self.members.iter().map(|a| a.render_debug()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assessors {
    pub members: Vec<Assessor>,
    pub position: Option<Position>,
}

impl ConfigNode for Assessors {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for assessor in &self.members {
            assessor.validate_errors()?;
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        for assessor in &self.members {
            assessor.validate_warnings(warnings);
        }
        let with_role = self.members.iter().filter(|a| a.role.is_some()).count();
        if with_role > 0 && with_role < self.members.len() {
            warnings.push(
                Warning::inconsistency(
                    Severity::High,
                    "Some assessors have a role and others do not",
                )
                .at_opt(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        render_children("Assessors", self.members.iter().map(|a| a.render_debug()))
    }
}
