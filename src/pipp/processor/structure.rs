//! Structural skeleton: which sections a document gets, and in what order
//!
//!     The skeleton is the declared `structure` list or, without one, the guide's default
//!     candidates filtered by what the document actually contains. The body always
//!     appears once, in front of the first back-matter section.

use super::sheet::StyleSheet;
use crate::pipp::document::SectionKind;
use crate::pipp::error::{ConfigError, PippError};
use crate::pipp::style::{AllowanceType, DocumentType, StructureType, StyleGuide};

/// What the document has material for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub has_abstract: bool,
    pub has_preface: bool,
    pub has_acknowledgements: bool,
    pub has_appendix: bool,
    pub has_notes: bool,
    pub has_sources: bool,
    pub has_assessors: bool,
}

impl ContentSummary {
    /// Whether a section has something to show. Sections generated from metadata always do.
    pub fn has_content(&self, structure: StructureType) -> bool {
        match structure {
            StructureType::Abstract => self.has_abstract,
            StructureType::Preface => self.has_preface,
            StructureType::Acknowledgements => self.has_acknowledgements,
            StructureType::Appendix => self.has_appendix,
            StructureType::Endnotes => self.has_notes,
            StructureType::Bibliography => self.has_sources,
            StructureType::Tables
            | StructureType::Figures
            | StructureType::Abbreviations
            | StructureType::Glossary => false,
            StructureType::TitlePage
            | StructureType::TableOfContents
            | StructureType::BlankPage
            | StructureType::AcademicIntegrity => true,
        }
    }
}

/// Sections of the default skeleton for this sheet and content
pub fn default_structure(sheet: &StyleSheet, content: &ContentSummary) -> Vec<StructureType> {
    sheet
        .guide
        .default_structure(sheet.document_type)
        .iter()
        .copied()
        .filter(|structure| match structure {
            StructureType::Endnotes => match sheet.endnotes {
                AllowanceType::Yes => true,
                AllowanceType::IfNecessary => content.has_notes,
                AllowanceType::No => false,
            },
            StructureType::AcademicIntegrity => {
                sheet.guide == StyleGuide::Pipp
                    && sheet.document_type == DocumentType::Paper
                    && content.has_assessors
            }
            StructureType::TitlePage | StructureType::TableOfContents => true,
            other => content.has_content(*other),
        })
        .collect()
}

/// The declared list or the default one
pub fn skeleton(sheet: &StyleSheet, content: &ContentSummary) -> Vec<StructureType> {
    match &sheet.structure {
        Some(declared) => declared.clone(),
        None => default_structure(sheet, content),
    }
}

/// Insert the body in front of the first back-matter section
pub fn outline(structures: &[StructureType]) -> Vec<SectionKind> {
    let body_at = structures
        .iter()
        .position(StructureType::is_back_matter)
        .unwrap_or(structures.len());
    let mut outline: Vec<SectionKind> = structures
        .iter()
        .copied()
        .map(SectionKind::Structure)
        .collect();
    outline.insert(body_at, SectionKind::Body);
    outline
}

/// Enforce the endnotes placement rules of the sheet
pub fn check_structure_order(
    structures: &[StructureType],
    sheet: &StyleSheet,
    has_notes: bool,
) -> Result<(), PippError> {
    let endnotes_at = structures
        .iter()
        .position(|structure| *structure == StructureType::Endnotes);

    if sheet.endnotes == AllowanceType::No {
        if endnotes_at.is_some() {
            return Err(ConfigError::illegal_configuration(
                "The style forbids endnotes but the structure contains an endnotes section",
            )
            .into());
        }
        if has_notes {
            return Err(ConfigError::illegal_configuration(
                "The style forbids endnotes but the document contains notes",
            )
            .into());
        }
    }

    let Some(endnotes_at) = endnotes_at else {
        return Ok(());
    };

    for required in sheet.guide.required_structure_before_endnotes() {
        let misplaced = structures
            .iter()
            .rposition(|structure| structure == required)
            .is_some_and(|index| index > endnotes_at);
        if misplaced {
            return Err(PippError::StructureOrder {
                section: *required,
                anchor: StructureType::Endnotes,
            });
        }
    }

    if let Some((before, position)) = sheet.endnotes_before {
        let anchor_at = structures.iter().position(|structure| *structure == before);
        if anchor_at.is_some_and(|index| index < endnotes_at) {
            log::debug!("endnotes must precede {before} (declared at {position})");
            return Err(PippError::StructureOrder {
                section: StructureType::Endnotes,
                anchor: before,
            });
        }
    }
    Ok(())
}
