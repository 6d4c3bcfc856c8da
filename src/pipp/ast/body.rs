//! Document content: chapters, paragraphs and the special content sections

use super::value::{check_content, debug_field, Scalar};
use super::{render_children, ConfigNode};
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::style::{ContentAlignment, Length, Percentage, StructureType};
use crate::pipp::token::Position;

/// One run of a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Text(Scalar),
    Emphasise(Scalar),
    Bold(Scalar),
    /// Title of a self-contained work
    Work(Scalar),
    Quote(Scalar),
    /// Endnote text; the sentence gets a marker where the note was written
    Note(Scalar),
    Citation {
        source: Scalar,
        page: Option<Scalar>,
    },
}

impl Run {
    pub fn scalar(&self) -> &Scalar {
        match self {
            Run::Text(text)
            | Run::Emphasise(text)
            | Run::Bold(text)
            | Run::Work(text)
            | Run::Quote(text)
            | Run::Note(text) => text,
            Run::Citation { source, .. } => source,
        }
    }

    fn render_debug(&self) -> String {
        match self {
            Run::Text(text) => format!("{:?}", text.value),
            Run::Emphasise(text) => format!("emphasise {:?}", text.value),
            Run::Bold(text) => format!("bold {:?}", text.value),
            Run::Work(text) => format!("work {:?}", text.value),
            Run::Quote(text) => format!("quote {:?}", text.value),
            Run::Note(text) => format!("note {:?}", text.value),
            Run::Citation { source, page } => match page {
                Some(page) => format!("citation {:?} page {:?}", source.value, page.value),
                None => format!("citation {:?}", source.value),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceNode {
    pub runs: Vec<Run>,
    pub position: Position,
}

impl SentenceNode {
    pub fn notes(&self) -> impl Iterator<Item = &Scalar> {
        self.runs.iter().filter_map(|run| match run {
            Run::Note(note) => Some(note),
            _ => None,
        })
    }

    pub fn citations(&self) -> impl Iterator<Item = &Scalar> {
        self.runs.iter().filter_map(|run| match run {
            Run::Citation { source, .. } => Some(source),
            _ => None,
        })
    }
}

impl ConfigNode for SentenceNode {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for run in &self.runs {
            run.scalar().require_content("sentence")?;
            if let Run::Citation {
                page: Some(page), ..
            } = run
            {
                page.require_content("page")?;
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, _warnings: &mut WarningQueue) {}

    fn render_debug(&self) -> String {
        let runs: Vec<String> = self.runs.iter().map(Run::render_debug).collect();
        format!("Sentence({})", runs.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// A body paragraph
    Body,
    Abstract,
    Preface,
    Acknowledgements,
    Appendix,
}

impl ContentKind {
    /// The structural section this content fills; `None` for the body
    pub fn structure(&self) -> Option<StructureType> {
        match self {
            ContentKind::Body => None,
            ContentKind::Abstract => Some(StructureType::Abstract),
            ContentKind::Preface => Some(StructureType::Preface),
            ContentKind::Acknowledgements => Some(StructureType::Acknowledgements),
            ContentKind::Appendix => Some(StructureType::Appendix),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ContentKind::Body => "Paragraph",
            ContentKind::Abstract => "Abstract",
            ContentKind::Preface => "Preface",
            ContentKind::Acknowledgements => "Acknowledgements",
            ContentKind::Appendix => "Appendix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: ContentKind,
    pub sentences: Vec<SentenceNode>,
    pub position: Position,
}

impl ConfigNode for ContentBlock {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for sentence in &self.sentences {
            sentence.validate_errors()?;
        }
        if self.sentences.is_empty() {
            return Err(ConfigError::missing_member(format!(
                "The {} section has no sentences",
                self.kind.name().to_lowercase()
            ))
            .at(self.position));
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        for sentence in &self.sentences {
            sentence.validate_warnings(warnings);
        }
    }

    fn render_debug(&self) -> String {
        render_children(
            self.kind.name(),
            self.sentences.iter().map(|s| s.render_debug()),
        )
    }
}

/// An image placed in the running text, either
/// `image "raven.png", "50%"` or a block of `id`, `width`, `height`, `size` and `display`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageNode {
    /// File name relative to the image folder
    pub id: Option<Scalar>,
    pub width: Option<Scalar>,
    pub height: Option<Scalar>,
    /// Relative to the image's own size
    pub size: Option<Scalar>,
    pub display: Option<Scalar>,
    pub position: Position,
}

impl ImageNode {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl ConfigNode for ImageNode {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        let Some(id) = &self.id else {
            return Err(ConfigError::missing_member("An image needs an id").at(self.position));
        };
        id.require_content("image id")?;
        for (field, name) in [(&self.width, "width"), (&self.height, "height")] {
            check_content(field, name)?;
            if let Some(length) = field {
                length.parse::<Length>()?;
            }
        }
        check_content(&self.size, "size")?;
        if let Some(size) = &self.size {
            size.parse::<Percentage>()?;
        }
        check_content(&self.display, "display")?;
        if let Some(display) = &self.display {
            display.parse::<ContentAlignment>()?;
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        if self.size.is_some() && (self.width.is_some() || self.height.is_some()) {
            warnings.push(
                Warning::inconsistency(
                    Severity::Low,
                    "The image size takes precedence over its width and height",
                )
                .at(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        let fields = [
            debug_field("id", &self.id),
            debug_field("width", &self.width),
            debug_field("height", &self.height),
            debug_field("size", &self.size),
            debug_field("display", &self.display),
        ];
        render_children("Image", fields.into_iter().flatten())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    Chapter(Scalar),
    Content(ContentBlock),
    /// The heading block (institution, people, title and date) at this point of the text
    Header(Position),
    /// A page left empty on purpose
    Blank(Position),
    Image(ImageNode),
}

/// All content sections in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub elements: Vec<BodyElement>,
}

impl Body {
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.elements.iter().filter_map(|element| match element {
            BodyElement::Content(block) => Some(block),
            _ => None,
        })
    }

    pub fn blocks_of(&self, kind: ContentKind) -> impl Iterator<Item = &ContentBlock> {
        self.blocks().filter(move |block| block.kind == kind)
    }

    pub fn has_content(&self, kind: ContentKind) -> bool {
        self.blocks_of(kind).next().is_some()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &SentenceNode> {
        self.blocks().flat_map(|block| block.sentences.iter())
    }

    pub fn has_notes(&self) -> bool {
        self.sentences().any(|sentence| sentence.notes().next().is_some())
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageNode> {
        self.elements.iter().filter_map(|element| match element {
            BodyElement::Image(image) => Some(image),
            _ => None,
        })
    }
}

impl ConfigNode for Body {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for element in &self.elements {
            match element {
                BodyElement::Chapter(heading) => heading.require_content("chapter")?,
                BodyElement::Content(block) => block.validate_errors()?,
                BodyElement::Image(image) => image.validate_errors()?,
                BodyElement::Header(_) | BodyElement::Blank(_) => {}
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        for block in self.blocks() {
            block.validate_warnings(warnings);
        }
        for image in self.images() {
            image.validate_warnings(warnings);
        }
    }

    fn render_debug(&self) -> String {
        render_children(
            "Body",
            self.elements.iter().map(|element| match element {
                BodyElement::Chapter(heading) => format!("Chapter({:?})", heading.value),
                BodyElement::Content(block) => block.render_debug(),
                BodyElement::Header(_) => "Header".to_string(),
                BodyElement::Blank(_) => "Blank".to_string(),
                BodyElement::Image(image) => image.render_debug(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(value: &str) -> Scalar {
        Scalar::new(value, Position::new(1, 1))
    }

    fn paragraph(kind: ContentKind, runs: Vec<Run>) -> ContentBlock {
        ContentBlock {
            kind,
            sentences: vec![SentenceNode {
                runs,
                position: Position::new(2, 2),
            }],
            position: Position::new(1, 1),
        }
    }

    #[test]
    fn test_body_queries() {
        let body = Body {
            elements: vec![
                BodyElement::Chapter(scalar("Introduction")),
                BodyElement::Content(paragraph(
                    ContentKind::Body,
                    vec![
                        Run::Text(scalar("As shown")),
                        Run::Note(scalar("See the appendix.")),
                        Run::Citation {
                            source: scalar("poe"),
                            page: Some(scalar("12")),
                        },
                    ],
                )),
                BodyElement::Content(paragraph(
                    ContentKind::Abstract,
                    vec![Run::Text(scalar("Summary"))],
                )),
            ],
        };
        assert!(body.has_content(ContentKind::Abstract));
        assert!(!body.has_content(ContentKind::Preface));
        assert!(body.has_notes());
        assert_eq!(
            body.sentences().flat_map(|s| s.citations()).count(),
            1
        );
        assert!(body.validate_errors().is_ok());
    }

    #[test]
    fn test_blank_run_fails() {
        let block = paragraph(ContentKind::Body, vec![Run::Bold(scalar("  "))]);
        assert!(block.validate_errors().is_err());
    }

    #[test]
    fn test_render_debug() {
        let block = paragraph(
            ContentKind::Preface,
            vec![Run::Text(scalar("Thanks")), Run::Work(scalar("Walden"))],
        );
        assert_eq!(
            block.render_debug(),
            "Preface[Sentence(\"Thanks\", work \"Walden\")]"
        );
    }

    fn image(id: Option<&str>, size: Option<&str>, width: Option<&str>) -> ImageNode {
        ImageNode {
            id: id.map(scalar),
            size: size.map(scalar),
            width: width.map(scalar),
            ..ImageNode::new(Position::new(4, 1))
        }
    }

    #[test]
    fn test_image_validation() {
        assert!(image(Some("raven.png"), Some("50%"), None).validate_errors().is_ok());
        assert!(image(Some("raven.png"), None, Some("40mm")).validate_errors().is_ok());

        let missing = image(None, None, None).validate_errors().unwrap_err();
        assert_eq!(missing.message, "An image needs an id");
        assert_eq!(missing.position, Some(Position::new(4, 1)));
        assert!(image(Some(" "), None, None).validate_errors().is_err());
        assert!(image(Some("raven.png"), Some("50"), None).validate_errors().is_err());
        assert!(image(Some("raven.png"), None, Some("2cm")).validate_errors().is_err());

        let mut misaligned = image(Some("raven.png"), None, None);
        misaligned.display = Some(scalar("Justified"));
        assert!(misaligned.validate_errors().is_err());
    }

    #[test]
    fn test_image_size_overrides_dimensions() {
        let mut warnings = WarningQueue::new();
        image(Some("raven.png"), Some("50%"), Some("40mm")).validate_warnings(&mut warnings);
        assert_eq!(warnings.len(), 1);

        let mut none = WarningQueue::new();
        image(Some("raven.png"), Some("50%"), None).validate_warnings(&mut none);
        assert!(none.is_empty());
    }

    #[test]
    fn test_layout_elements_render() {
        let body = Body {
            elements: vec![
                BodyElement::Header(Position::new(1, 1)),
                BodyElement::Blank(Position::new(2, 1)),
                BodyElement::Image(image(Some("raven.png"), Some("50%"), None)),
            ],
        };
        assert!(body.validate_errors().is_ok());
        assert_eq!(body.blocks().count(), 0);
        assert_eq!(
            body.render_debug(),
            "Body[Header, Blank, Image[id: \"raven.png\", size: \"50%\"]]"
        );
    }
}
