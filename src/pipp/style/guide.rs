//! The shipped style guides
//!
//! A [StyleGuide] is a closed set of formatting and citation rules. The fixed values of
//! each guide live in a [GuideRules] table next to the guide's citation functions
//! (`mla9.rs`, `pipp.rs`); everything that varies by guide is dispatched here with an
//! exhaustive match, so a new guide is a compile-time obligation everywhere.

use super::text;
use super::types::{
    AllowanceType, ContentAlignment, DocumentType, NumerationPosition, NumerationType,
    StructureType, WhitespaceAllowanceType,
};
use super::units::{Colour, Length, PageFormat};
use super::{mla9, pipp};
use crate::pipp::bibliography::Name;
use crate::pipp::document::{FormattedParagraph, Span, TextRun};
use chrono::NaiveDate;
use std::fmt;

/// Fixed values of one style guide
#[derive(Debug)]
pub(super) struct GuideRules {
    pub name: &'static str,
    pub document_type: DocumentType,
    pub font: &'static str,
    pub font_size: u32,
    pub font_colour: Colour,
    pub page_format: PageFormat,
    pub margin: Length,
    pub spacing: f32,
    pub paragraph_indentation: Length,
    pub sentence_prefix: &'static str,
    pub numeration_type: NumerationType,
    pub front_matter_numeration: NumerationType,
    pub numeration_position: NumerationPosition,
    pub numeration_margin: Length,
    pub bold: AllowanceType,
    pub italic: AllowanceType,
    pub whitespace: WhitespaceAllowanceType,
    pub endnotes: AllowanceType,
    pub required_before_endnotes: &'static [StructureType],
    /// Punctuation beyond `. ? ! , ; :`
    pub extra_punctuation: &'static [char],
    /// Spacing after punctuation, sentence capitalization and completion
    pub strict_sentences: bool,
    pub image_alignment: ContentAlignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleGuide {
    Mla9,
    Pipp,
}

impl StyleGuide {
    pub const ALL: [StyleGuide; 2] = [StyleGuide::Mla9, StyleGuide::Pipp];

    fn rules(&self) -> &'static GuideRules {
        match self {
            StyleGuide::Mla9 => &mla9::RULES,
            StyleGuide::Pipp => &pipp::RULES,
        }
    }

    pub fn name(&self) -> &'static str {
        self.rules().name
    }

    pub fn document_type(&self) -> DocumentType {
        self.rules().document_type
    }

    pub fn font(&self) -> &'static str {
        self.rules().font
    }

    pub fn font_colour(&self) -> Colour {
        self.rules().font_colour
    }

    pub fn font_size(&self) -> u32 {
        self.rules().font_size
    }

    pub fn margin(&self) -> Length {
        self.rules().margin
    }

    /// Line spacing as a multiple of the font's line height
    pub fn spacing(&self) -> f32 {
        self.rules().spacing
    }

    pub fn paragraph_indentation(&self) -> Length {
        self.rules().paragraph_indentation
    }

    /// Separator placed before every sentence of a paragraph except the first
    pub fn sentence_prefix(&self) -> &'static str {
        self.rules().sentence_prefix
    }

    /// Numeration of the body and the back matter
    pub fn numeration_type(&self) -> NumerationType {
        self.rules().numeration_type
    }

    pub fn front_matter_numeration(&self) -> NumerationType {
        self.rules().front_matter_numeration
    }

    pub fn numeration_position(&self) -> NumerationPosition {
        self.rules().numeration_position
    }

    pub fn numeration_margin(&self) -> Length {
        self.rules().numeration_margin
    }

    pub fn page_format(&self) -> PageFormat {
        self.rules().page_format
    }

    /// Alignment of images that declare no `display`
    pub fn image_alignment(&self) -> ContentAlignment {
        self.rules().image_alignment
    }

    /// Sections that must come before the endnotes whenever both are present
    pub fn required_structure_before_endnotes(&self) -> &'static [StructureType] {
        self.rules().required_before_endnotes
    }

    pub fn bold_allowance(&self) -> AllowanceType {
        self.rules().bold
    }

    pub fn italic_allowance(&self) -> AllowanceType {
        self.rules().italic
    }

    pub fn whitespace_allowance(&self) -> WhitespaceAllowanceType {
        self.rules().whitespace
    }

    pub fn endnotes_allowance(&self) -> AllowanceType {
        self.rules().endnotes
    }

    pub fn allows_bold(&self) -> bool {
        self.bold_allowance().permits()
    }

    pub fn allows_italic(&self) -> bool {
        self.italic_allowance().permits()
    }

    pub fn allows_whitespace(&self) -> bool {
        self.whitespace_allowance() != WhitespaceAllowanceType::No
    }

    pub fn strict_sentences(&self) -> bool {
        self.rules().strict_sentences
    }

    pub fn is_punctuation(&self, character: char) -> bool {
        matches!(character, '.' | '?' | '!' | ',' | ';' | ':')
            || self.rules().extra_punctuation.contains(&character)
    }

    /// Punctuation that ends a sentence
    pub fn is_terminal(&self, character: char) -> bool {
        matches!(character, '.' | '?' | '!')
            || (self.is_punctuation(character) && !matches!(character, ',' | ';' | ':'))
    }

    /// Format one run with this guide's own rules
    pub fn format_text(&self, run: &TextRun) -> Span {
        let rules = self.rules();
        let content = text::normalize(
            &run.content,
            rules.whitespace,
            rules.strict_sentences,
            |c| self.is_punctuation(c),
        );
        let emphasis = text::gate_emphasis(run.emphasis, rules.bold, rules.italic);
        Span::new(content, emphasis)
    }

    /// Assemble formatted sentences into one paragraph
    pub fn format_paragraph(&self, sentences: &[Vec<Span>]) -> FormattedParagraph {
        text::assemble_paragraph(
            sentences,
            self.paragraph_indentation().to_points(),
            self.sentence_prefix(),
            self.strict_sentences(),
            |c| self.is_terminal(c),
        )
    }

    /// Candidate sections of the default skeleton, in order. The processor drops the
    /// ones the document has no content for.
    pub fn default_structure(&self, document_type: DocumentType) -> &'static [StructureType] {
        use StructureType::*;
        match (self, document_type) {
            (StyleGuide::Mla9, DocumentType::Paper) => {
                &[Abstract, Preface, Acknowledgements, Appendix, Endnotes, Bibliography]
            }
            (StyleGuide::Mla9, DocumentType::Book) => &[
                TitlePage,
                Abstract,
                Preface,
                Acknowledgements,
                TableOfContents,
                Appendix,
                Endnotes,
                Bibliography,
            ],
            (StyleGuide::Pipp, DocumentType::Paper) => &[
                TitlePage,
                Abstract,
                Preface,
                Acknowledgements,
                Appendix,
                Endnotes,
                Bibliography,
                AcademicIntegrity,
            ],
            (StyleGuide::Pipp, DocumentType::Book) => &[
                TitlePage,
                Preface,
                Acknowledgements,
                Abstract,
                TableOfContents,
                Appendix,
                Endnotes,
                Bibliography,
            ],
        }
    }

    pub fn date_to_string(&self, date: NaiveDate) -> String {
        match self {
            StyleGuide::Mla9 => mla9::date(date),
            StyleGuide::Pipp => pipp::date(date),
        }
    }

    pub fn bibliography_title(&self, entries: usize) -> String {
        match self {
            StyleGuide::Mla9 => mla9::bibliography_title(entries),
            StyleGuide::Pipp => pipp::bibliography_title(entries),
        }
    }

    pub fn endnotes_title(&self) -> &'static str {
        match self {
            StyleGuide::Mla9 => "Notes",
            StyleGuide::Pipp => "Endnotes",
        }
    }

    /// Contributor list at the head of a bibliography entry, without the closing period
    pub fn author_list(&self, names: &[Name]) -> String {
        match self {
            StyleGuide::Mla9 => mla9::author_list(names),
            StyleGuide::Pipp => pipp::author_list(names),
        }
    }

    /// Parenthetical reference placed after cited material
    pub fn in_text_citation(&self, names: &[Name], title: &str, page: Option<&str>) -> String {
        match self {
            StyleGuide::Mla9 => mla9::in_text_citation(names, title, page),
            StyleGuide::Pipp => pipp::in_text_citation(names, title, page),
        }
    }

    /// Opening sentence of the academic integrity declaration
    pub fn integrity_statement(&self, authors: &str, document_type: DocumentType) -> String {
        match self {
            StyleGuide::Mla9 => format!(
                "I, {authors}, certify that this {document_type} is my own work and that every source is documented."
            ),
            StyleGuide::Pipp => format!(
                "I hereby declare that this {document_type} was written by {authors} and that all sources used are acknowledged."
            ),
        }
    }
}

impl fmt::Display for StyleGuide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
