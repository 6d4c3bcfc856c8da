//! Effective style settings: the guide's defaults with the user's overrides applied

use crate::pipp::ast::{Scalar, Style};
use crate::pipp::document::{FormattedParagraph, Span, TextRun};
use crate::pipp::error::{ConfigError, PippError};
use crate::pipp::style::{
    text, AllowanceType, Colour, DocumentType, Length, NumerationPosition, NumerationType,
    PageFormat, PageRange, StructureType, StyleGuide, StyleTable, WhitespaceAllowanceType,
};
use crate::pipp::token::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub guide: StyleGuide,
    /// Guide that renders citations and the bibliography
    pub citation: StyleGuide,
    pub document_type: DocumentType,
    pub font: String,
    pub font_size: u32,
    pub font_colour: Colour,
    pub page_format: PageFormat,
    pub margin: Length,
    pub spacing: f32,
    pub indentation: Length,
    pub sentence_prefix: String,
    pub whitespace: WhitespaceAllowanceType,
    pub bold: AllowanceType,
    pub italic: AllowanceType,
    pub numeration: NumerationType,
    pub front_matter_numeration: NumerationType,
    pub numeration_position: NumerationPosition,
    pub numeration_margin: Length,
    /// Expanded, sorted and free of duplicates
    pub skipped_pages: Vec<u32>,
    /// The declared structure list, when there is one
    pub structure: Option<Vec<StructureType>>,
    pub endnotes: AllowanceType,
    /// Section the endnotes must precede
    pub endnotes_before: Option<(StructureType, Position)>,
}

impl StyleSheet {
    /// The guide's settings, untouched
    pub fn from_guide(guide: StyleGuide, document_type: DocumentType) -> Self {
        Self {
            guide,
            citation: guide,
            document_type,
            font: guide.font().to_string(),
            font_size: guide.font_size(),
            font_colour: guide.font_colour(),
            page_format: guide.page_format(),
            margin: guide.margin(),
            spacing: guide.spacing(),
            indentation: guide.paragraph_indentation(),
            sentence_prefix: guide.sentence_prefix().to_string(),
            whitespace: guide.whitespace_allowance(),
            bold: guide.bold_allowance(),
            italic: guide.italic_allowance(),
            numeration: guide.numeration_type(),
            front_matter_numeration: guide.front_matter_numeration(),
            numeration_position: guide.numeration_position(),
            numeration_margin: guide.numeration_margin(),
            skipped_pages: Vec::new(),
            structure: None,
            endnotes: guide.endnotes_allowance(),
            endnotes_before: None,
        }
    }

    /// Resolve the named guide and apply the style block on top of it
    pub fn resolve(
        style: Option<&Style>,
        default_style: &str,
        document_type: Option<DocumentType>,
        table: &StyleTable,
    ) -> Result<Self, PippError> {
        let base = style.and_then(|style| style.base.as_ref());
        let guide = match base {
            Some(name) => table.resolve(&name.value, Some(name.position))?,
            None => table.resolve(default_style, None)?,
        };
        let document_type = document_type.unwrap_or_else(|| guide.document_type());
        let mut sheet = Self::from_guide(guide, document_type);

        if let Some(style) = style {
            if let Some(citation) = &style.citation {
                sheet.citation = table.resolve(&citation.value, Some(citation.position))?;
            }
            sheet.apply(style)?;
        }
        log::debug!(
            "style sheet resolved: guide {}, citations {}",
            sheet.guide,
            sheet.citation
        );
        Ok(sheet)
    }

    fn apply(&mut self, style: &Style) -> Result<(), ConfigError> {
        if let Some(font) = &style.font {
            override_with(&mut self.font, &font.name, |name| Ok(name.value.trim().to_string()))?;
            override_with(&mut self.font_size, &font.size, |size| size.parse_positive("font size"))?;
            override_with(&mut self.font_colour, &font.colour, Scalar::parse)?;
        }

        if let Some(layout) = &style.layout {
            let width = layout.width.as_ref().map(Scalar::parse::<Length>).transpose()?;
            let height = layout.height.as_ref().map(Scalar::parse::<Length>).transpose()?;
            if width.is_some() || height.is_some() {
                self.page_format = PageFormat {
                    name: "custom",
                    width: width.map_or(self.page_format.width, |length| length.to_points()),
                    height: height.map_or(self.page_format.height, |length| length.to_points()),
                };
            }
            override_with(&mut self.margin, &layout.margin, Scalar::parse)?;
            override_with(&mut self.spacing, &layout.spacing, Scalar::parse_spacing)?;
        }

        if let Some(paragraph) = &style.paragraph {
            override_with(&mut self.indentation, &paragraph.indentation, Scalar::parse)?;
        }

        if let Some(sentence) = &style.sentence {
            override_with(&mut self.sentence_prefix, &sentence.prefix, |prefix| {
                Ok(prefix.value.clone())
            })?;
            override_with(&mut self.whitespace, &sentence.whitespace, Scalar::parse)?;
            override_with(&mut self.bold, &sentence.bold, Scalar::parse)?;
            override_with(&mut self.italic, &sentence.italic, Scalar::parse)?;
        }

        if let Some(numeration) = &style.numeration {
            override_with(&mut self.numeration, &numeration.kind, Scalar::parse)?;
            override_with(&mut self.numeration_position, &numeration.display, Scalar::parse)?;
            override_with(&mut self.numeration_margin, &numeration.margin, Scalar::parse)?;
            let mut pages = Vec::new();
            for skip in &numeration.skip {
                pages.extend(skip.parse::<PageRange>()?.pages());
            }
            pages.sort_unstable();
            pages.dedup();
            self.skipped_pages = pages;
        }

        if let Some(structure) = &style.structure {
            self.structure = Some(structure.structures()?);
        }

        if let Some(endnotes) = &style.endnotes {
            override_with(&mut self.endnotes, &endnotes.allow, Scalar::parse)?;
            if let Some(before) = &endnotes.before {
                self.endnotes_before = Some((before.parse()?, before.position));
            }
        }
        Ok(())
    }

    /// Format one run under the effective whitespace and emphasis settings
    pub fn format_text(&self, run: &TextRun) -> Span {
        let guide = self.guide;
        let content = text::normalize(
            &run.content,
            self.whitespace,
            guide.strict_sentences(),
            move |c| guide.is_punctuation(c),
        );
        Span::new(content, text::gate_emphasis(run.emphasis, self.bold, self.italic))
    }

    pub fn format_paragraph(&self, sentences: &[Vec<Span>]) -> FormattedParagraph {
        let guide = self.guide;
        text::assemble_paragraph(
            sentences,
            self.indentation.to_points(),
            &self.sentence_prefix,
            guide.strict_sentences(),
            move |c| guide.is_terminal(c),
        )
    }

    /// Numeration of the pages a section starts on
    pub fn numeration_for(&self, structure: Option<StructureType>) -> NumerationType {
        match structure {
            Some(structure) if structure.is_front_matter() => self.front_matter_numeration,
            _ => self.numeration,
        }
    }
}

/// Replace `target` with the parsed field, when the field is present
fn override_with<T>(
    target: &mut T,
    field: &Option<Scalar>,
    parse: impl FnOnce(&Scalar) -> Result<T, ConfigError>,
) -> Result<(), ConfigError> {
    if let Some(scalar) = field {
        *target = parse(scalar)?;
    }
    Ok(())
}
