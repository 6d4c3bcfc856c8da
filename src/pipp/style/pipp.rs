//! The permissive house style, used when a document names no style

use super::guide::GuideRules;
use super::types::{
    AllowanceType, ContentAlignment, DocumentType, NumerationPosition, NumerationType,
    StructureType, WhitespaceAllowanceType,
};
use super::units::{Colour, Length, LengthUnit, PageFormat};
use crate::pipp::bibliography::Name;
use chrono::NaiveDate;

pub(super) const RULES: GuideRules = GuideRules {
    name: "Pipp",
    document_type: DocumentType::Paper,
    font: "Helvetica",
    font_size: 11,
    font_colour: Colour::BLACK,
    page_format: PageFormat::A4,
    margin: Length {
        value: 1.0,
        unit: LengthUnit::Inch,
    },
    spacing: 1.5,
    paragraph_indentation: Length {
        value: 0.0,
        unit: LengthUnit::Inch,
    },
    sentence_prefix: " ",
    numeration_type: NumerationType::Arabic,
    front_matter_numeration: NumerationType::Arabic,
    numeration_position: NumerationPosition::Bottom,
    numeration_margin: Length {
        value: 0.5,
        unit: LengthUnit::Inch,
    },
    bold: AllowanceType::Yes,
    italic: AllowanceType::Yes,
    whitespace: WhitespaceAllowanceType::Yes,
    endnotes: AllowanceType::IfNecessary,
    required_before_endnotes: &[StructureType::TitlePage, StructureType::TableOfContents],
    extra_punctuation: &['\u{2026}', '\u{203d}'],
    strict_sentences: false,
    image_alignment: ContentAlignment::Centre,
};

/// Full names joined with commas and a final ampersand
pub(super) fn author_list(names: &[Name]) -> String {
    let full: Vec<String> = names.iter().map(Name::full).collect();
    match full.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} & {}", rest.join(", "), last),
    }
}

pub(super) fn in_text_citation(names: &[Name], title: &str, page: Option<&str>) -> String {
    let source = match names {
        [] => title.to_string(),
        [only] => only.surname.clone(),
        [first, second] => format!("{} & {}", first.surname, second.surname),
        [first, ..] => format!("{} et al.", first.surname),
    };
    match page {
        Some(page) => format!("[{source}, p. {page}]"),
        None => format!("[{source}]"),
    }
}

pub(super) fn date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub(super) fn bibliography_title(_entries: usize) -> String {
    "Bibliography".to_string()
}
