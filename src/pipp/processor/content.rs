//! Body formatting: sentences to paragraphs, notes to endnotes, citations to references

use super::sheet::StyleSheet;
use crate::pipp::ast::{Body, BodyElement, ContentBlock, ImageNode, Run, Scalar, SentenceNode};
use crate::pipp::bibliography::Work;
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::document::{Block, Emphasis, ImageBlock, Span, TextRun};
use crate::pipp::style::{AllowanceType, ContentAlignment, Length, Percentage, StructureType};
use std::collections::{HashMap, HashSet};

/// Formatted content, sorted by destination
#[derive(Debug, Default)]
pub struct FormattedContent {
    pub body: Vec<Block>,
    /// Content of the special sections (abstract, preface, acknowledgements, appendix)
    pub sections: HashMap<StructureType, Vec<Block>>,
    /// `Block::Note`s in marker order
    pub notes: Vec<Block>,
    pub chapters: Vec<String>,
    /// Ids of the sources cited in the text
    pub cited: HashSet<String>,
}

pub struct ContentFormatter<'a> {
    sheet: &'a StyleSheet,
    works: &'a HashMap<String, Work>,
    warnings: &'a mut WarningQueue,
    /// Lines of the `header` block
    header: Vec<String>,
    content: FormattedContent,
}

impl<'a> ContentFormatter<'a> {
    pub fn new(
        sheet: &'a StyleSheet,
        works: &'a HashMap<String, Work>,
        warnings: &'a mut WarningQueue,
    ) -> Self {
        Self {
            sheet,
            works,
            warnings,
            header: Vec::new(),
            content: FormattedContent::default(),
        }
    }

    pub fn with_header(mut self, lines: Vec<String>) -> Self {
        self.header = lines;
        self
    }

    pub fn format(mut self, body: &Body) -> FormattedContent {
        for element in &body.elements {
            match element {
                BodyElement::Chapter(heading) => {
                    let text = self.sheet.format_text(&TextRun::regular(&heading.value)).text;
                    self.content.chapters.push(text.clone());
                    self.content.body.push(Block::Heading { text, level: 1 });
                }
                BodyElement::Content(block) => {
                    let paragraph = self.paragraph(block);
                    match block.kind.structure() {
                        Some(structure) => self
                            .content
                            .sections
                            .entry(structure)
                            .or_default()
                            .push(paragraph),
                        None => self.content.body.push(paragraph),
                    }
                }
                BodyElement::Header(_) => self.content.body.push(Block::Header {
                    lines: self.header.clone(),
                }),
                BodyElement::Blank(_) => self.content.body.push(Block::BlankPage),
                BodyElement::Image(image) => {
                    if let Some(block) = self.image(image) {
                        self.content.body.push(block);
                    }
                }
            }
        }
        log::debug!(
            "formatted {} body blocks and {} notes",
            self.content.body.len(),
            self.content.notes.len()
        );
        self.content
    }

    fn paragraph(&mut self, block: &ContentBlock) -> Block {
        let sentences: Vec<Vec<Span>> = block
            .sentences
            .iter()
            .map(|sentence| self.sentence(sentence))
            .collect();
        Block::Paragraph(self.sheet.format_paragraph(&sentences))
    }

    fn sentence(&mut self, sentence: &SentenceNode) -> Vec<Span> {
        let mut spans = Vec::with_capacity(sentence.runs.len());
        for run in &sentence.runs {
            let value = &run.scalar().value;
            match run {
                Run::Text(_) => spans.push(self.sheet.format_text(&TextRun::regular(value))),
                Run::Emphasise(text) => {
                    if self.sheet.italic == AllowanceType::IfNecessary {
                        self.warnings.push(
                            Warning::self_check(
                                Severity::Low,
                                "The style allows italics only where necessary",
                            )
                            .at(text.position),
                        );
                    }
                    spans.push(self.formatted(value, Emphasis::Italic));
                }
                Run::Bold(text) => {
                    if !self.sheet.bold.permits() {
                        self.warnings.push(
                            Warning::inconsistency(
                                Severity::High,
                                "The style does not allow bold text; it is printed regular",
                            )
                            .at(text.position),
                        );
                    }
                    spans.push(self.formatted(value, Emphasis::Bold));
                }
                Run::Work(_) => spans.push(self.formatted(value, Emphasis::Italic)),
                Run::Quote(_) => {
                    let mut span = self.formatted(value, Emphasis::Regular);
                    span.text = format!("\"{}\"", span.text);
                    spans.push(span);
                }
                Run::Note(_) => {
                    let number = self.content.notes.len() as u32 + 1;
                    let text = self.formatted(value, Emphasis::Regular);
                    self.content.notes.push(Block::Note {
                        number,
                        paragraph: self.sheet.format_paragraph(&[vec![text]]),
                    });
                    spans.push(Span::new(number.to_string(), Emphasis::Superscript));
                }
                Run::Citation { source, page } => {
                    let id = source.value.trim();
                    if let Some(work) = self.works.get(id) {
                        let page = page.as_ref().map(|page| page.value.trim());
                        spans.push(Span::regular(work.in_text(self.sheet.citation, page)));
                        self.content.cited.insert(id.to_string());
                    } else {
                        log::warn!("citation \"{id}\" names no source and is left out");
                    }
                }
            }
        }
        spans
    }

    /// Validation has already checked every field; values that do not parse are dropped
    fn image(&self, image: &ImageNode) -> Option<Block> {
        let id = image.id.as_ref()?.value.trim().to_string();
        let scale = image
            .size
            .as_ref()
            .and_then(|size| size.value.parse::<Percentage>().ok())
            .map(|percent| percent.0);
        let points = |field: &Option<Scalar>| {
            field
                .as_ref()
                .and_then(|length| length.value.parse::<Length>().ok())
                .map(|length| length.to_points())
        };
        let (width, height) = match scale {
            Some(_) => (None, None),
            None => (points(&image.width), points(&image.height)),
        };
        let alignment = image
            .display
            .as_ref()
            .and_then(|display| display.value.parse::<ContentAlignment>().ok())
            .unwrap_or_else(|| self.sheet.guide.image_alignment());
        Some(Block::Image(ImageBlock {
            id,
            alignment,
            scale,
            width,
            height,
        }))
    }

    fn formatted(&self, text: &str, emphasis: Emphasis) -> Span {
        self.sheet.format_text(&TextRun::new(text, emphasis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::ast::{ContentKind, ImageNode, Scalar};
    use crate::pipp::bibliography::{Book, Common, Name};
    use crate::pipp::document::plain_text;
    use crate::pipp::style::{DocumentType, StyleGuide};
    use crate::pipp::token::Position;

    fn scalar(value: &str) -> Scalar {
        Scalar::new(value, Position::new(1, 1))
    }

    fn body(kind: ContentKind, runs: Vec<Run>) -> Body {
        Body {
            elements: vec![BodyElement::Content(ContentBlock {
                kind,
                sentences: vec![SentenceNode {
                    runs,
                    position: Position::new(2, 5),
                }],
                position: Position::new(1, 1),
            })],
        }
    }

    fn works() -> HashMap<String, Work> {
        let austen = Work::Book(Book {
            common: Common {
                id: Some("austen".into()),
                authors: vec![Name::parse("Jane Austen")],
                title: "Emma".into(),
                year: Some("1815".into()),
                url: None,
            },
            publisher: "John Murray".into(),
            edition: None,
        });
        HashMap::from([("austen".to_string(), austen)])
    }

    fn paragraph_text(blocks: &[Block]) -> String {
        match blocks.first() {
            Some(Block::Paragraph(paragraph)) => plain_text(&paragraph.spans),
            other => panic!("expected a paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_mla9_sentence_with_citation() {
        let sheet = StyleSheet::from_guide(StyleGuide::Mla9, DocumentType::Paper);
        let works = works();
        let mut warnings = WarningQueue::new();
        let content = ContentFormatter::new(&sheet, &works, &mut warnings).format(&body(
            ContentKind::Body,
            vec![
                Run::Text(scalar("the heroine is   charming")),
                Run::Citation {
                    source: scalar("austen"),
                    page: Some(scalar("12")),
                },
            ],
        ));
        assert_eq!(paragraph_text(&content.body), "The heroine is charming (Austen 12).");
        assert!(content.cited.contains("austen"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_notes_and_bold_warning() {
        let sheet = StyleSheet::from_guide(StyleGuide::Mla9, DocumentType::Paper);
        let works = works();
        let mut warnings = WarningQueue::new();
        let content = ContentFormatter::new(&sheet, &works, &mut warnings).format(&body(
            ContentKind::Abstract,
            vec![
                Run::Bold(scalar("Ravens")),
                Run::Text(scalar("are clever.")),
                Run::Note(scalar("see the appendix")),
            ],
        ));
        let abstract_blocks = &content.sections[&StructureType::Abstract];
        assert_eq!(paragraph_text(abstract_blocks), "Ravens are clever.1");
        assert_eq!(content.notes.len(), 1);
        assert!(matches!(&content.notes[0], Block::Note { number: 1, paragraph }
            if paragraph.text() == "See the appendix."));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings.iter().next().map(|w| w.severity), Some(Severity::High));
    }

    #[test]
    fn test_pipp_keeps_emphasis() {
        let sheet = StyleSheet::from_guide(StyleGuide::Pipp, DocumentType::Paper);
        let works = works();
        let mut warnings = WarningQueue::new();
        let content = ContentFormatter::new(&sheet, &works, &mut warnings).format(&body(
            ContentKind::Body,
            vec![
                Run::Text(scalar("Read")),
                Run::Work(scalar("Emma")),
                Run::Quote(scalar("twice")),
                Run::Citation {
                    source: scalar("austen"),
                    page: None,
                },
            ],
        ));
        match content.body.first() {
            Some(Block::Paragraph(paragraph)) => {
                assert_eq!(paragraph.text(), "Read Emma \"twice\" [Austen]");
                assert_eq!(paragraph.spans[1], Span::italic("Emma"));
            }
            other => panic!("expected a paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_elements() {
        let sheet = StyleSheet::from_guide(StyleGuide::Mla9, DocumentType::Paper);
        let works = works();
        let mut warnings = WarningQueue::new();
        let sized = ImageNode {
            id: Some(scalar("raven.png")),
            size: Some(scalar("50%")),
            width: Some(scalar("1in")),
            ..ImageNode::new(Position::new(3, 1))
        };
        let placed = ImageNode {
            id: Some(scalar("crow.png")),
            width: Some(scalar("1in")),
            height: Some(scalar("25.4mm")),
            display: Some(scalar("Left")),
            ..ImageNode::new(Position::new(4, 1))
        };
        let body = Body {
            elements: vec![
                BodyElement::Header(Position::new(1, 1)),
                BodyElement::Blank(Position::new(2, 1)),
                BodyElement::Image(sized),
                BodyElement::Image(placed),
            ],
        };
        let content = ContentFormatter::new(&sheet, &works, &mut warnings)
            .with_header(vec!["Jane Doe".into(), "On Ravens".into()])
            .format(&body);

        assert_eq!(
            content.body[0],
            Block::Header {
                lines: vec!["Jane Doe".into(), "On Ravens".into()]
            }
        );
        assert_eq!(content.body[1], Block::BlankPage);
        assert_eq!(
            content.body[2],
            Block::Image(ImageBlock {
                id: "raven.png".into(),
                alignment: ContentAlignment::Centre,
                scale: Some(50),
                width: None,
                height: None,
            })
        );
        match &content.body[3] {
            Block::Image(image) => {
                assert_eq!(image.alignment, ContentAlignment::Left);
                assert_eq!(image.scale, None);
                assert!((image.width.unwrap_or_default() - 72.0).abs() < 0.01);
                assert!((image.height.unwrap_or_default() - 72.0).abs() < 0.01);
            }
            other => panic!("expected an image, got {:?}", other),
        }
    }
}
