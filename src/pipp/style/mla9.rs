//! MLA Handbook, 9th edition

use super::guide::GuideRules;
use super::types::{
    AllowanceType, ContentAlignment, DocumentType, NumerationPosition, NumerationType,
    StructureType, WhitespaceAllowanceType,
};
use super::units::{Colour, Length, LengthUnit, PageFormat};
use crate::pipp::bibliography::Name;
use chrono::NaiveDate;

const INCH: LengthUnit = LengthUnit::Inch;

pub(super) const RULES: GuideRules = GuideRules {
    name: "MLA9",
    document_type: DocumentType::Paper,
    font: "Times Roman",
    font_size: 12,
    font_colour: Colour::BLACK,
    page_format: PageFormat::LETTER,
    margin: Length { value: 1.0, unit: INCH },
    spacing: 2.0,
    paragraph_indentation: Length { value: 0.5, unit: INCH },
    sentence_prefix: " ",
    numeration_type: NumerationType::Arabic,
    front_matter_numeration: NumerationType::Roman,
    numeration_position: NumerationPosition::TopRight,
    numeration_margin: Length { value: 0.5, unit: INCH },
    bold: AllowanceType::No,
    italic: AllowanceType::IfNecessary,
    whitespace: WhitespaceAllowanceType::No,
    endnotes: AllowanceType::IfNecessary,
    required_before_endnotes: &[
        StructureType::TitlePage,
        StructureType::Abstract,
        StructureType::Preface,
        StructureType::Acknowledgements,
        StructureType::TableOfContents,
        StructureType::Appendix,
    ],
    extra_punctuation: &[],
    strict_sentences: true,
    image_alignment: ContentAlignment::Centre,
};

/// `Last, First`, `Last, First, and First Last`, `Last, First, et al.`
pub(super) fn author_list(names: &[Name]) -> String {
    match names {
        [] => String::new(),
        [only] => only.inverted(),
        [first, second] => format!("{}, and {}", first.inverted(), second.full()),
        [first, ..] => format!("{}, et al.", first.inverted()),
    }
}

pub(super) fn in_text_citation(names: &[Name], title: &str, page: Option<&str>) -> String {
    let source = match names {
        [] => format!("\"{title}\""),
        [only] => only.surname.clone(),
        [first, second] => format!("{} and {}", first.surname, second.surname),
        [first, ..] => format!("{} et al.", first.surname),
    };
    match page {
        Some(page) => format!("({source} {page})"),
        None => format!("({source})"),
    }
}

pub(super) fn date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

pub(super) fn bibliography_title(entries: usize) -> String {
    if entries == 1 {
        "Work Cited".to_string()
    } else {
        "Works Cited".to_string()
    }
}
