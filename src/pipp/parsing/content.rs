//! Content sections, sentences and the bibliography

use super::parser::{assign, Parser, Step};
use super::ParseError;
use crate::pipp::ast::{
    Bibliography, BodyElement, Configuration, ContentBlock, ContentKind, ImageNode, Run, Scalar,
    SentenceNode, Source, SourceKind,
};
use crate::pipp::token::{Keyword, Token};

const SENTENCE_CONTENT: &str =
    "sentence content (a text, emphasise, bold, work, quote, note or citation)";
const SOURCE_KINDS: &str = "a source kind (book, music, periodical, poem, videogame, webpage)";
const IMAGE_FIELDS: &str = "an image setting (id, width, height, size, display)";

impl<'a, 'src> Parser<'a, 'src> {
    pub(super) fn chapter_section(&mut self, configuration: &mut Configuration) -> Step<()> {
        let heading = self.scalar_line("a chapter heading")?;
        configuration.body.elements.push(BodyElement::Chapter(heading));
        Ok(())
    }

    /// One sentence per block line, or a single sentence on the keyword's line
    pub(super) fn content_section(
        &mut self,
        opener: &Token,
        kind: ContentKind,
        configuration: &mut Configuration,
    ) -> Step<()> {
        let mut sentences = Vec::new();
        if self.opens_block()? {
            self.block(opener, |parser, first| {
                sentences.push(parser.sentence_line(&first)?);
                Ok(())
            })?;
        } else {
            let first = match self.peek(0)? {
                Some(token) => token,
                None => return Err(self.unexpected(SENTENCE_CONTENT)),
            };
            sentences.push(self.sentence_line(&first)?);
        }

        configuration.body.elements.push(BodyElement::Content(ContentBlock {
            kind,
            sentences,
            position: opener.position,
        }));
        Ok(())
    }

    /// `image "id"`, `image "id", "size"`, `image "id", "width", "height"`, or a field block
    pub(super) fn image_section(
        &mut self,
        opener: &Token,
        configuration: &mut Configuration,
    ) -> Step<()> {
        let mut image = ImageNode::new(opener.position);
        if self.opens_block()? {
            self.field_block(opener, &mut image, IMAGE_FIELDS, image_field)?;
        } else {
            let mut values = self.scalar_list("an image id")?.into_iter();
            image.id = values.next();
            match (values.next(), values.next(), values.next()) {
                (size, None, None) => image.size = size,
                (Some(width), Some(height), None) => {
                    image.width = Some(width);
                    image.height = Some(height);
                }
                _ => {
                    return Err(ParseError::new(
                        "an image takes an id, then a size or a width and a height",
                        opener,
                    )
                    .into())
                }
            }
            self.end_of_line()?;
        }
        configuration.body.elements.push(BodyElement::Image(image));
        Ok(())
    }

    /// Runs up to and including the end of the line
    fn sentence_line(&mut self, first: &Token) -> Step<SentenceNode> {
        let mut runs = Vec::new();
        while let Some(token) = self.peek(0)? {
            if token.is_new_line() {
                self.advance()?;
                break;
            }
            if token.is_separator() {
                self.advance()?;
                continue;
            }
            if token.is_text() {
                runs.push(Run::Text(self.scalar("a text")?));
                continue;
            }

            let keyword = match token.keyword() {
                Some(keyword) if keyword.is_run() => keyword,
                _ => return Err(ParseError::unexpected(SENTENCE_CONTENT, &token).into()),
            };
            self.advance()?;
            let value = self.scalar(&format!("a text after `{keyword}`"))?;
            let run = match keyword {
                Keyword::Emphasise => Run::Emphasise(value),
                Keyword::Bold => Run::Bold(value),
                Keyword::Work => Run::Work(value),
                Keyword::Quote => Run::Quote(value),
                Keyword::Note => Run::Note(value),
                _ => {
                    let page = if self.peek(0)?.and_then(|t| t.keyword()) == Some(Keyword::Page) {
                        self.advance()?;
                        Some(self.scalar("a page after `page`")?)
                    } else {
                        None
                    };
                    Run::Citation {
                        source: value,
                        page,
                    }
                }
            };
            runs.push(run);
        }

        if runs.is_empty() {
            return Err(ParseError::unexpected(SENTENCE_CONTENT, first).into());
        }
        Ok(SentenceNode {
            runs,
            position: first.position,
        })
    }

    pub(super) fn bibliography_section(&mut self, opener: &Token) -> Step<Bibliography> {
        let mut bibliography = Bibliography {
            sources: Vec::new(),
            position: Some(opener.position),
        };
        self.block(opener, |parser, member| {
            let keyword = parser.member_keyword(&member, SOURCE_KINDS, |keyword| {
                SourceKind::from_keyword(keyword).is_some()
            })?;
            let Some(kind) = SourceKind::from_keyword(keyword) else {
                return Err(ParseError::unexpected(SOURCE_KINDS, &member).into());
            };
            bibliography.sources.push(parser.source(&member, kind)?);
            Ok(())
        })?;
        Ok(bibliography)
    }

    fn source(&mut self, opener: &Token, kind: SourceKind) -> Step<Source> {
        let mut source = Source::new(kind, opener.position);
        let expected = format!("a field of a {kind} source");
        self.block(opener, |parser, member| {
            let keyword = parser.member_keyword(&member, &expected, |keyword| kind.accepts(keyword))?;
            if keyword == Keyword::Author {
                if !source.authors.is_empty() {
                    return Err(
                        ParseError::new("`author` is declared more than once", &member).into(),
                    );
                }
                source.authors = parser.scalar_list("an author name")?;
                return parser.end_of_line();
            }
            let value = parser.scalar_line(&format!("a text after `{keyword}`"))?;
            match source.field_mut(keyword) {
                Some(slot) => assign(slot, value, &member),
                None => Err(ParseError::unexpected(&expected, &member).into()),
            }
        })?;
        Ok(source)
    }
}

fn image_field(image: &mut ImageNode, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Id => Some(&mut image.id),
        Keyword::Width => Some(&mut image.width),
        Keyword::Height => Some(&mut image.height),
        Keyword::Size => Some(&mut image.size),
        Keyword::Display => Some(&mut image.display),
        _ => None,
    }
}
