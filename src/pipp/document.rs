//! Formatted document model
//!
//! The processor's output. It is fully resolved (every length in points, every text run
//! formatted, every section ordered) so a renderer only has to lay it out on pages. The
//! model serializes with serde; the CLI prints it as JSON.

use super::style::{
    Colour, ContentAlignment, DocumentType, NumerationPosition, NumerationType, PageFormat,
    StructureType,
};
use serde::Serialize;

/// Emphasis of a formatted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    #[default]
    Regular,
    Italic,
    Bold,
    /// Endnote markers
    Superscript,
}

/// A text run as written in the source, before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub content: String,
    pub emphasis: Emphasis,
}

impl TextRun {
    pub fn new(content: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            content: content.into(),
            emphasis,
        }
    }

    pub fn regular(content: impl Into<String>) -> Self {
        Self::new(content, Emphasis::Regular)
    }
}

/// A formatted run of text with uniform emphasis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub emphasis: Emphasis,
}

impl Span {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    pub fn regular(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::Regular)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::Italic)
    }
}

/// Concatenated text of spans, ignoring emphasis
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedParagraph {
    /// First-line indentation in points
    pub indentation: f32,
    pub spans: Vec<Span>,
}

impl FormattedParagraph {
    pub fn text(&self) -> String {
        plain_text(&self.spans)
    }
}

/// One bibliography entry, already in the style's citation form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BibliographyEntry {
    pub id: Option<String>,
    pub spans: Vec<Span>,
    #[serde(skip)]
    pub sort_key: (String, String),
}

impl BibliographyEntry {
    pub fn text(&self) -> String {
        plain_text(&self.spans)
    }
}

/// An image the renderer loads by id. `scale` wins over `width` and `height`; with none
/// of them the image keeps its own size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub id: String,
    pub alignment: ContentAlignment,
    /// Percent of the image's own size
    pub scale: Option<u32>,
    /// Points
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String, level: u8 },
    /// A centered single line (title page, heading block, contents entries)
    Line { text: String },
    Paragraph(FormattedParagraph),
    Note { number: u32, paragraph: FormattedParagraph },
    Entry(BibliographyEntry),
    /// Left-aligned lines naming the institution, the people, the title and the date
    Header { lines: Vec<String> },
    BlankPage,
    Image(ImageBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "structure", rename_all = "snake_case")]
pub enum SectionKind {
    Structure(StructureType),
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub numeration: NumerationType,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind, heading: Option<String>, numeration: NumerationType) -> Self {
        Self {
            kind,
            heading,
            numeration,
            blocks: Vec::new(),
        }
    }

    pub fn structure(&self) -> Option<StructureType> {
        match self.kind {
            SectionKind::Structure(structure) => Some(structure),
            SectionKind::Body => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub assessors: Vec<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageGeometry {
    pub format: PageFormat,
    pub margin: f32,
    pub line_spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontData {
    pub name: String,
    pub size: u32,
    pub colour: Colour,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumerationSettings {
    pub body: NumerationType,
    pub front_matter: NumerationType,
    pub position: NumerationPosition,
    pub margin: f32,
    pub skipped_pages: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    pub compiler_version: String,
    pub style: String,
    pub document_type: DocumentType,
    pub metadata: Metadata,
    pub page: PageGeometry,
    pub font: FontData,
    pub numeration: NumerationSettings,
    /// First-page heading lines, used by styles without a title page
    pub heading: Vec<String>,
    pub sections: Vec<Section>,
}

impl DocumentModel {
    pub fn section(&self, structure: StructureType) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.structure() == Some(structure))
    }

    pub fn body(&self) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.kind == SectionKind::Body)
    }

    /// Section kinds in document order
    pub fn outline(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|section| section.kind).collect()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
