//! The tree root
//!
//!     A [Configuration] owns every section of one specification. Its own checks are the
//!     ones that need more than one section at a time: a book needs a publication venue,
//!     a paper rarely has an edition, and every cited source id must name a bibliography
//!     entry.

use super::bibliography::Bibliography;
use super::body::Body;
use super::person::{Assessors, Authors};
use super::publication::Publication;
use super::style::Style;
use super::title::Title;
use super::value::Scalar;
use super::ConfigNode;
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::style::DocumentType;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    pub version: Option<Scalar>,
    pub document_type: Option<Scalar>,
    pub title: Title,
    pub authors: Authors,
    pub assessors: Assessors,
    pub publication: Option<Publication>,
    pub style: Option<Style>,
    pub body: Body,
    pub bibliography: Option<Bibliography>,
}

impl Configuration {
    /// The declared document type, if any
    pub fn document_type(&self) -> Result<Option<DocumentType>, ConfigError> {
        self.document_type
            .as_ref()
            .map(|scalar| scalar.parse::<DocumentType>())
            .transpose()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_ref().map(|version| version.value.trim())
    }

    fn check_citations(&self) -> Result<(), ConfigError> {
        for sentence in self.body.sentences() {
            for citation in sentence.citations() {
                let id = citation.value.trim();
                let known = self
                    .bibliography
                    .as_ref()
                    .is_some_and(|bibliography| bibliography.find(id).is_some());
                if !known {
                    return Err(ConfigError::missing_member(format!(
                        "The citation \"{id}\" names no bibliography source"
                    ))
                    .at(citation.position));
                }
            }
        }
        Ok(())
    }
}

impl ConfigNode for Configuration {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        if let Some(version) = &self.version {
            version.require_content("version")?;
        }
        self.title.validate_errors()?;
        self.authors.validate_errors()?;
        self.assessors.validate_errors()?;
        if let Some(publication) = &self.publication {
            publication.validate_errors()?;
        }
        if let Some(style) = &self.style {
            style.validate_errors()?;
        }
        self.body.validate_errors()?;
        if let Some(bibliography) = &self.bibliography {
            bibliography.validate_errors()?;
        }

        if self.document_type()? == Some(DocumentType::Book) {
            let has_venue = self
                .publication
                .as_ref()
                .is_some_and(|publication| publication.venue.is_some());
            if !has_venue {
                let position = self.document_type.as_ref().map(|scalar| scalar.position);
                return Err(
                    ConfigError::missing_member("A book requires a publication venue")
                        .at_opt(position),
                );
            }
        }
        self.check_citations()
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        self.title.validate_warnings(warnings);
        self.authors.validate_warnings(warnings);
        self.assessors.validate_warnings(warnings);
        if let Some(publication) = &self.publication {
            publication.validate_warnings(warnings);
        }
        if let Some(style) = &self.style {
            style.validate_warnings(warnings);
        }
        self.body.validate_warnings(warnings);
        if let Some(bibliography) = &self.bibliography {
            bibliography.validate_warnings(warnings);
        }

        let is_paper = matches!(self.document_type(), Ok(None | Some(DocumentType::Paper)));
        if let Some(edition) = self.publication.as_ref().and_then(|p| p.edition.as_ref()) {
            if is_paper {
                warnings.push(
                    Warning::unlikeliness(Severity::Low, "Papers rarely have an edition")
                        .at(edition.position),
                );
            }
        }
        if self.publication.is_none() {
            warnings.push(Warning::missing_member(
                Severity::Low,
                "No publication date is given; today's date is used",
            ));
        }
        if self.body.blocks().next().is_none() {
            warnings.push(Warning::missing_member(
                Severity::High,
                "The document has no content",
            ));
        }
    }

    fn render_debug(&self) -> String {
        let mut lines = Vec::new();
        if let Some(version) = &self.version {
            lines.push(format!("Version({:?})", version.value));
        }
        if let Some(document_type) = &self.document_type {
            lines.push(format!("Type({:?})", document_type.value));
        }
        lines.push(self.title.render_debug());
        lines.push(self.authors.render_debug());
        if !self.assessors.members.is_empty() {
            lines.push(self.assessors.render_debug());
        }
        if let Some(publication) = &self.publication {
            lines.push(publication.render_debug());
        }
        if let Some(style) = &self.style {
            lines.push(style.render_debug());
        }
        lines.push(self.body.render_debug());
        if let Some(bibliography) = &self.bibliography {
            lines.push(bibliography.render_debug());
        }
        lines.join("\n")
    }
}
