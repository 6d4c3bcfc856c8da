//! The `style` section
//!
//!     `style "MLA9"` names a style guide. The block form names the guide with `of` and
//!     overrides single settings of it; every override is kept as written here and only
//!     checked for shape. Resolving the guide names and merging the overrides into the
//!     guide defaults is the processor's job.

use super::value::{check_content, debug_field, Scalar};
use super::ConfigNode;
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::style::{
    AllowanceType, Colour, Length, LengthUnit, NumerationPosition, NumerationType, PageRange,
    StructureType, WhitespaceAllowanceType,
};
use crate::pipp::token::Position;
use std::collections::HashSet;

const LARGEST_LIKELY_FONT: u32 = 96;
const SMALLEST_LIKELY_FONT: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontConfig {
    pub name: Option<Scalar>,
    pub size: Option<Scalar>,
    pub colour: Option<Scalar>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutConfig {
    pub width: Option<Scalar>,
    pub height: Option<Scalar>,
    pub margin: Option<Scalar>,
    pub spacing: Option<Scalar>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParagraphConfig {
    pub indentation: Option<Scalar>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SentenceConfig {
    pub prefix: Option<Scalar>,
    pub whitespace: Option<Scalar>,
    pub bold: Option<Scalar>,
    pub italic: Option<Scalar>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumerationConfig {
    pub kind: Option<Scalar>,
    pub display: Option<Scalar>,
    pub margin: Option<Scalar>,
    pub skip: Vec<Scalar>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndnotesConfig {
    pub allow: Option<Scalar>,
    pub before: Option<Scalar>,
    pub position: Position,
}

/// A declared section order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureList {
    pub sections: Vec<Scalar>,
    pub position: Position,
}

impl StructureList {
    pub fn structures(&self) -> Result<Vec<StructureType>, ConfigError> {
        self.sections.iter().map(Scalar::parse).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    /// Name of the base style guide
    pub base: Option<Scalar>,
    pub font: Option<FontConfig>,
    pub layout: Option<LayoutConfig>,
    pub paragraph: Option<ParagraphConfig>,
    pub sentence: Option<SentenceConfig>,
    pub numeration: Option<NumerationConfig>,
    pub structure: Option<StructureList>,
    /// Name of the guide used for citations, when it differs from the base
    pub citation: Option<Scalar>,
    pub endnotes: Option<EndnotesConfig>,
    pub position: Position,
}

impl Style {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// The scalar form `style "MLA9"`
    pub fn named(base: Scalar) -> Self {
        Self {
            position: base.position,
            base: Some(base),
            ..Self::default()
        }
    }

    /// Every length written in the block
    fn lengths(&self) -> Vec<&Scalar> {
        let mut lengths = Vec::new();
        if let Some(layout) = &self.layout {
            lengths.extend([&layout.width, &layout.height, &layout.margin].into_iter().flatten());
        }
        if let Some(paragraph) = &self.paragraph {
            lengths.extend(paragraph.indentation.iter());
        }
        if let Some(numeration) = &self.numeration {
            lengths.extend(numeration.margin.iter());
        }
        lengths
    }
}

fn check_parse<T>(field: &Option<Scalar>) -> Result<(), ConfigError>
where
    T: std::str::FromStr<Err = crate::pipp::style::InvalidValue>,
{
    if let Some(scalar) = field {
        scalar.parse::<T>()?;
    }
    Ok(())
}

impl ConfigNode for FontConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_content(&self.name, "font name")?;
        if let Some(size) = &self.size {
            size.parse_positive("font size")?;
        }
        check_parse::<Colour>(&self.colour)
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        let Some(size) = &self.size else {
            return;
        };
        match size.parse_positive("font size") {
            Ok(points) if points > LARGEST_LIKELY_FONT => warnings.push(
                Warning::unlikeliness(
                    Severity::High,
                    format!("A font size of {points} is unusually large"),
                )
                .at(size.position),
            ),
            Ok(points) if points < SMALLEST_LIKELY_FONT => warnings.push(
                Warning::unlikeliness(
                    Severity::Low,
                    format!("A font size of {points} is unusually small"),
                )
                .at(size.position),
            ),
            _ => {}
        }
    }

    fn render_debug(&self) -> String {
        fields_debug(
            "Font",
            [
                debug_field("name", &self.name),
                debug_field("size", &self.size),
                debug_field("colour", &self.colour),
            ],
        )
    }
}

impl ConfigNode for LayoutConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_parse::<Length>(&self.width)?;
        check_parse::<Length>(&self.height)?;
        check_parse::<Length>(&self.margin)?;
        if let Some(spacing) = &self.spacing {
            spacing.parse_spacing()?;
        }
        Ok(())
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        fields_debug(
            "Layout",
            [
                debug_field("width", &self.width),
                debug_field("height", &self.height),
                debug_field("margin", &self.margin),
                debug_field("spacing", &self.spacing),
            ],
        )
    }
}

impl ConfigNode for ParagraphConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_parse::<Length>(&self.indentation)
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        fields_debug("Paragraph", [debug_field("indentation", &self.indentation)])
    }
}

impl ConfigNode for SentenceConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_parse::<WhitespaceAllowanceType>(&self.whitespace)?;
        check_parse::<AllowanceType>(&self.bold)?;
        check_parse::<AllowanceType>(&self.italic)
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        fields_debug(
            "Sentence",
            [
                debug_field("prefix", &self.prefix),
                debug_field("whitespace", &self.whitespace),
                debug_field("bold", &self.bold),
                debug_field("italic", &self.italic),
            ],
        )
    }
}

impl ConfigNode for NumerationConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_parse::<NumerationType>(&self.kind)?;
        check_parse::<NumerationPosition>(&self.display)?;
        check_parse::<Length>(&self.margin)?;
        for page in &self.skip {
            page.parse::<PageRange>()?;
        }
        Ok(())
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        let skip: Vec<&str> = self.skip.iter().map(Scalar::as_str).collect();
        let mut fields: Vec<String> = [
            debug_field("type", &self.kind),
            debug_field("display", &self.display),
            debug_field("margin", &self.margin),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !skip.is_empty() {
            fields.push(format!("skip: {:?}", skip));
        }
        format!("Numeration({})", fields.join(", "))
    }
}

impl ConfigNode for EndnotesConfig {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        check_parse::<AllowanceType>(&self.allow)?;
        check_parse::<StructureType>(&self.before)
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        fields_debug(
            "Endnotes",
            [
                debug_field("allow", &self.allow),
                debug_field("before", &self.before),
            ],
        )
    }
}

impl ConfigNode for StructureList {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (scalar, structure) in self.sections.iter().zip(self.structures()?) {
            if !structure.is_repeatable() && !seen.insert(structure) {
                return Err(ConfigError::illegal_configuration(format!(
                    "The {structure} section is declared more than once"
                ))
                .at(scalar.position));
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        let names: Vec<&str> = self.sections.iter().map(Scalar::as_str).collect();
        format!("Structure({})", names.join(", "))
    }
}

impl ConfigNode for Style {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        if let Some(font) = &self.font {
            font.validate_errors()?;
        }
        if let Some(layout) = &self.layout {
            layout.validate_errors()?;
        }
        if let Some(paragraph) = &self.paragraph {
            paragraph.validate_errors()?;
        }
        if let Some(sentence) = &self.sentence {
            sentence.validate_errors()?;
        }
        if let Some(numeration) = &self.numeration {
            numeration.validate_errors()?;
        }
        if let Some(structure) = &self.structure {
            structure.validate_errors()?;
        }
        if let Some(endnotes) = &self.endnotes {
            endnotes.validate_errors()?;
        }
        check_content(&self.base, "style name")?;
        check_content(&self.citation, "citation style")
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        if let Some(font) = &self.font {
            font.validate_warnings(warnings);
        }

        let units: HashSet<LengthUnit> = self
            .lengths()
            .into_iter()
            .filter_map(|scalar| scalar.parse::<Length>().ok())
            .filter(|length| length.value > 0.0)
            .map(|length| length.unit)
            .collect();
        if units.len() > 1 {
            warnings.push(
                Warning::inconsistency(
                    Severity::Low,
                    "The style mixes lengths in inches and millimetres",
                )
                .at(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(base) = &self.base {
            parts.push(format!("of: {:?}", base.value));
        }
        if let Some(font) = &self.font {
            parts.push(font.render_debug());
        }
        if let Some(layout) = &self.layout {
            parts.push(layout.render_debug());
        }
        if let Some(paragraph) = &self.paragraph {
            parts.push(paragraph.render_debug());
        }
        if let Some(sentence) = &self.sentence {
            parts.push(sentence.render_debug());
        }
        if let Some(numeration) = &self.numeration {
            parts.push(numeration.render_debug());
        }
        if let Some(structure) = &self.structure {
            parts.push(structure.render_debug());
        }
        if let Some(citation) = &self.citation {
            parts.push(format!("citation: {:?}", citation.value));
        }
        if let Some(endnotes) = &self.endnotes {
            parts.push(endnotes.render_debug());
        }
        format!("Style({})", parts.join(", "))
    }
}

fn fields_debug<const N: usize>(name: &str, fields: [Option<String>; N]) -> String {
    let present: Vec<String> = fields.into_iter().flatten().collect();
    format!("{name}({})", present.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::error::ConfigErrorKind;

    fn text(value: &str) -> Option<Scalar> {
        Some(Scalar::new(value, Position::new(5, 9)))
    }

    fn list(values: &[&str]) -> StructureList {
        StructureList {
            sections: values
                .iter()
                .map(|value| Scalar::new(*value, Position::new(6, 15)))
                .collect(),
            position: Position::new(6, 5),
        }
    }

    #[test]
    fn test_structure_duplicates() {
        assert!(list(&["titlepage", "blankpage", "blankpage", "bibliography"])
            .validate_errors()
            .is_ok());
        let error = list(&["abstract", "Abstract"]).validate_errors().unwrap_err();
        assert_eq!(error.kind, ConfigErrorKind::IllegalConfiguration);
        let unknown = list(&["prologue"]).validate_errors().unwrap_err();
        assert_eq!(unknown.kind, ConfigErrorKind::IncorrectFormat);
    }

    #[test]
    fn test_value_formats() {
        let style = Style {
            layout: Some(LayoutConfig {
                margin: text("one inch"),
                ..LayoutConfig::default()
            }),
            ..Style::default()
        };
        assert_eq!(
            style.validate_errors().unwrap_err().kind,
            ConfigErrorKind::IncorrectFormat
        );

        let spacing = LayoutConfig {
            spacing: text("-1"),
            ..LayoutConfig::default()
        };
        assert!(spacing.validate_errors().is_err());

        let skip = NumerationConfig {
            skip: vec![Scalar::new("5-3", Position::new(1, 1))],
            ..NumerationConfig::default()
        };
        assert!(skip.validate_errors().is_err());
    }

    #[test]
    fn test_font_size_warnings() {
        let large = FontConfig {
            size: text("120"),
            ..FontConfig::default()
        };
        let mut warnings = WarningQueue::new();
        large.validate_warnings(&mut warnings);
        assert_eq!(warnings.highest_severity(), Some(Severity::High));

        let small = FontConfig {
            size: text("4"),
            ..FontConfig::default()
        };
        let mut warnings = WarningQueue::new();
        small.validate_warnings(&mut warnings);
        assert_eq!(warnings.highest_severity(), Some(Severity::Low));
    }

    #[test]
    fn test_mixed_units_warning() {
        let style = Style {
            layout: Some(LayoutConfig {
                margin: text("1in"),
                ..LayoutConfig::default()
            }),
            paragraph: Some(ParagraphConfig {
                indentation: text("12.7mm"),
                ..ParagraphConfig::default()
            }),
            ..Style::default()
        };
        assert!(style.validate_errors().is_ok());
        let mut warnings = WarningQueue::new();
        style.validate_warnings(&mut warnings);
        assert_eq!(warnings.len(), 1);
    }
}
