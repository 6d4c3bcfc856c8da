//! Closed enumerations of the style domain
//!
//! All of them parse leniently from specification text: case, surrounding whitespace and
//! word separators (space, `_`, `-`) are ignored, so `If Necessary`, `if_necessary` and
//! `IFNECESSARY` name the same value.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A specification value outside the domain of the type it was parsed as
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{found}\" is not a valid {expected}")]
pub struct InvalidValue {
    pub expected: &'static str,
    pub found: String,
}

impl InvalidValue {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

/// Canonical spelling used for matching: lowercase, separators removed
pub(crate) fn canonical(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Paper,
    Book,
}

impl FromStr for DocumentType {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "paper" => Ok(DocumentType::Paper),
            "book" => Ok(DocumentType::Book),
            _ => Err(InvalidValue::new("document type (Paper, Book)", value)),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Paper => f.write_str("paper"),
            DocumentType::Book => f.write_str("book"),
        }
    }
}

/// One structural section of the final document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    TitlePage,
    Abstract,
    Preface,
    Acknowledgements,
    TableOfContents,
    Tables,
    Figures,
    Abbreviations,
    Glossary,
    Appendix,
    Endnotes,
    Bibliography,
    BlankPage,
    AcademicIntegrity,
}

impl StructureType {
    pub const ALL: [StructureType; 14] = [
        StructureType::TitlePage,
        StructureType::Abstract,
        StructureType::Preface,
        StructureType::Acknowledgements,
        StructureType::TableOfContents,
        StructureType::Tables,
        StructureType::Figures,
        StructureType::Abbreviations,
        StructureType::Glossary,
        StructureType::Appendix,
        StructureType::Endnotes,
        StructureType::Bibliography,
        StructureType::BlankPage,
        StructureType::AcademicIntegrity,
    ];

    /// Keyword spelling, as written in a `structure` list
    pub fn name(&self) -> &'static str {
        match self {
            StructureType::TitlePage => "titlepage",
            StructureType::Abstract => "abstract",
            StructureType::Preface => "preface",
            StructureType::Acknowledgements => "acknowledgements",
            StructureType::TableOfContents => "tableofcontents",
            StructureType::Tables => "tables",
            StructureType::Figures => "figures",
            StructureType::Abbreviations => "abbreviations",
            StructureType::Glossary => "glossary",
            StructureType::Appendix => "appendix",
            StructureType::Endnotes => "endnotes",
            StructureType::Bibliography => "bibliography",
            StructureType::BlankPage => "blankpage",
            StructureType::AcademicIntegrity => "academicintegrity",
        }
    }

    /// Default section heading. Bibliography and endnotes headings come from the style guide.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            StructureType::TitlePage | StructureType::BlankPage => None,
            StructureType::Abstract => Some("Abstract"),
            StructureType::Preface => Some("Preface"),
            StructureType::Acknowledgements => Some("Acknowledgements"),
            StructureType::TableOfContents => Some("Table of Contents"),
            StructureType::Tables => Some("List of Tables"),
            StructureType::Figures => Some("List of Figures"),
            StructureType::Abbreviations => Some("List of Abbreviations"),
            StructureType::Glossary => Some("Glossary"),
            StructureType::Appendix => Some("Appendix"),
            StructureType::Endnotes => Some("Notes"),
            StructureType::Bibliography => Some("Bibliography"),
            StructureType::AcademicIntegrity => Some("Declaration of Academic Integrity"),
        }
    }

    /// Sections placed after the body
    pub fn is_back_matter(&self) -> bool {
        matches!(
            self,
            StructureType::Appendix
                | StructureType::Endnotes
                | StructureType::Bibliography
                | StructureType::AcademicIntegrity
        )
    }

    /// Sections numbered with the front-matter numeration
    pub fn is_front_matter(&self) -> bool {
        !self.is_back_matter() && *self != StructureType::BlankPage
    }

    /// Only blank pages may appear more than once
    pub fn is_repeatable(&self) -> bool {
        *self == StructureType::BlankPage
    }
}

impl FromStr for StructureType {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(value);
        StructureType::ALL
            .into_iter()
            .find(|structure| structure.name() == wanted)
            .ok_or_else(|| InvalidValue::new("structure section", value))
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumerationType {
    Arabic,
    Roman,
}

impl NumerationType {
    /// Render a page number
    pub fn render(&self, number: u32) -> String {
        match self {
            NumerationType::Arabic => number.to_string(),
            NumerationType::Roman => to_roman(number),
        }
    }
}

fn to_roman(mut number: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while number >= value {
            out.push_str(numeral);
            number -= value;
        }
    }
    out
}

impl FromStr for NumerationType {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "arabic" => Ok(NumerationType::Arabic),
            "roman" => Ok(NumerationType::Roman),
            _ => Err(InvalidValue::new("numeration type (Arabic, Roman)", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumerationPosition {
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for NumerationPosition {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "top" => Ok(NumerationPosition::Top),
            "bottom" => Ok(NumerationPosition::Bottom),
            "topleft" => Ok(NumerationPosition::TopLeft),
            "topright" => Ok(NumerationPosition::TopRight),
            "bottomleft" => Ok(NumerationPosition::BottomLeft),
            "bottomright" => Ok(NumerationPosition::BottomRight),
            _ => Err(InvalidValue::new("numeration position", value)),
        }
    }
}

/// Horizontal placement of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentAlignment {
    Left,
    Centre,
    Right,
}

impl FromStr for ContentAlignment {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "left" => Ok(ContentAlignment::Left),
            "center" | "centre" => Ok(ContentAlignment::Centre),
            "right" => Ok(ContentAlignment::Right),
            _ => Err(InvalidValue::new("alignment (Left, Center, Right)", value)),
        }
    }
}

/// Gate for an optional formatting behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    Yes,
    No,
    IfNecessary,
}

impl AllowanceType {
    pub fn permits(&self) -> bool {
        !matches!(self, AllowanceType::No)
    }
}

impl FromStr for AllowanceType {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "yes" => Ok(AllowanceType::Yes),
            "no" => Ok(AllowanceType::No),
            "ifnecessary" => Ok(AllowanceType::IfNecessary),
            _ => Err(InvalidValue::new(
                "allowance (Yes, No, If Necessary)",
                value,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitespaceAllowanceType {
    /// Whitespace is kept as written
    Yes,
    /// Every whitespace run collapses to one space
    No,
    /// Space runs collapse; escaped line feeds and tabs survive
    Escaped,
}

impl FromStr for WhitespaceAllowanceType {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical(value).as_str() {
            "yes" => Ok(WhitespaceAllowanceType::Yes),
            "no" => Ok(WhitespaceAllowanceType::No),
            "escaped" => Ok(WhitespaceAllowanceType::Escaped),
            _ => Err(InvalidValue::new(
                "whitespace allowance (Yes, No, Escaped)",
                value,
            )),
        }
    }
}
