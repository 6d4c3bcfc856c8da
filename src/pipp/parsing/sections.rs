//! Configuration sections

use super::parser::{assign, Parser, Step};
use super::ParseError;
use crate::pipp::ast::{
    BodyElement, Citation, CitedText, Configuration, ContentKind, EndnotesConfig, FontConfig,
    LayoutConfig, NumerationConfig, ParagraphConfig, Person, Publication, Scalar, SentenceConfig,
    Style, StructureList,
};
use crate::pipp::token::{Keyword, Token};

const PERSON_FIELDS: &str = "a person field (name, firstname, lastname, role, institution)";
const PUBLICATION_FIELDS: &str =
    "a publication field (title, venue, date, edition, institution, chair, semester)";
const STYLE_MEMBERS: &str = "a style setting (of, font, layout, paragraph, sentence, numeration, structure, citation, endnotes)";

impl<'a, 'src> Parser<'a, 'src> {
    /// One top-level section, starting at its keyword
    pub(super) fn section(&mut self, configuration: &mut Configuration) -> Step<()> {
        let Some(token) = self.peek(0)? else {
            return Ok(());
        };
        let keyword = match token.keyword() {
            Some(keyword) if keyword.is_section() && token.indent == 0 && !token.is_indent() => {
                keyword
            }
            _ => return Err(self.unexpected("a section keyword at the start of a line")),
        };
        self.advance()?;

        let repeatable = matches!(
            keyword,
            Keyword::Author
                | Keyword::Assessor
                | Keyword::Chapter
                | Keyword::Paragraph
                | Keyword::Header
                | Keyword::Blank
                | Keyword::Image
        );
        if !repeatable && !self.seen.insert(keyword) {
            return Err(ParseError::new(
                format!("the `{keyword}` section is declared more than once"),
                &token,
            )
            .into());
        }

        match keyword {
            Keyword::Version => {
                if self.sections > 0 {
                    return Err(ParseError::new(
                        "the version must be declared before every other section",
                        &token,
                    )
                    .into());
                }
                configuration.version = Some(self.scalar_line("a version text")?);
            }
            Keyword::Type => {
                configuration.document_type = Some(self.scalar_line("a document type")?);
            }
            Keyword::Title => self.title_section(&token, configuration)?,
            Keyword::Author => {
                let people = self.person_section(&token)?;
                let authors = &mut configuration.authors;
                authors.position.get_or_insert(token.position);
                authors.members.extend(people);
            }
            Keyword::Assessor => {
                let people = self.person_section(&token)?;
                let assessors = &mut configuration.assessors;
                assessors.position.get_or_insert(token.position);
                assessors.members.extend(people);
            }
            Keyword::Publication => {
                let mut publication = Publication::new(token.position);
                self.field_block(&token, &mut publication, PUBLICATION_FIELDS, publication_field)?;
                configuration.publication = Some(publication);
            }
            Keyword::Style => configuration.style = Some(self.style_section(&token)?),
            Keyword::Chapter => self.chapter_section(configuration)?,
            Keyword::Paragraph => self.content_section(&token, ContentKind::Body, configuration)?,
            Keyword::Abstract => {
                self.content_section(&token, ContentKind::Abstract, configuration)?
            }
            Keyword::Preface => self.content_section(&token, ContentKind::Preface, configuration)?,
            Keyword::Acknowledgements => {
                self.content_section(&token, ContentKind::Acknowledgements, configuration)?
            }
            Keyword::Appendix => {
                self.content_section(&token, ContentKind::Appendix, configuration)?
            }
            Keyword::Bibliography => {
                configuration.bibliography = Some(self.bibliography_section(&token)?)
            }
            Keyword::Header => {
                self.end_of_line()?;
                configuration.body.elements.push(BodyElement::Header(token.position));
            }
            Keyword::Blank => {
                self.end_of_line()?;
                configuration.body.elements.push(BodyElement::Blank(token.position));
            }
            Keyword::Image => self.image_section(&token, configuration)?,
            _ => return Err(ParseError::unexpected("a section keyword", &token).into()),
        }
        Ok(())
    }

    /// `title "Plain", work "Larger Work"`, or one fragment list per block line
    fn title_section(&mut self, opener: &Token, configuration: &mut Configuration) -> Step<()> {
        let mut fragments = Vec::new();
        if self.opens_block()? {
            self.block(opener, |parser, _| {
                fragments.extend(parser.fragment_list()?);
                parser.end_of_line()
            })?;
        } else {
            fragments = self.fragment_list()?;
            self.end_of_line()?;
        }
        configuration.title.fragments = fragments;
        configuration.title.position = Some(opener.position);
        Ok(())
    }

    fn fragment_list(&mut self) -> Step<Vec<CitedText>> {
        let mut fragments = vec![self.fragment()?];
        while self.peek(0)?.is_some_and(|token| token.is_separator()) {
            self.advance()?;
            fragments.push(self.fragment()?);
        }
        Ok(fragments)
    }

    fn fragment(&mut self) -> Step<CitedText> {
        match self.peek(0)? {
            Some(token) if token.is_text() => Ok(CitedText::Plain(self.scalar("a title text")?)),
            Some(token) if token.keyword() == Some(Keyword::Work) => {
                self.advance()?;
                let work = self.scalar("the title of the cited work")?;
                Ok(CitedText::Cited(Citation { work }))
            }
            _ => Err(self.unexpected("a title text or `work`")),
        }
    }

    /// Names on one line, or one person described field by field
    fn person_section(&mut self, opener: &Token) -> Step<Vec<Person>> {
        if self.opens_block()? {
            let mut person = Person::new(opener.position);
            self.field_block(opener, &mut person, PERSON_FIELDS, person_field)?;
            Ok(vec![person])
        } else {
            let names = self.scalar_list("a name")?;
            self.end_of_line()?;
            Ok(names.into_iter().map(Person::named).collect())
        }
    }

    fn style_section(&mut self, opener: &Token) -> Step<Style> {
        if !self.opens_block()? {
            return Ok(Style::named(self.scalar_line("a style name")?));
        }

        let mut style = Style::new(opener.position);
        self.block(opener, |parser, member| {
            let keyword = parser.member_keyword(&member, STYLE_MEMBERS, is_style_member)?;
            let duplicate = || -> Step<()> {
                Err(ParseError::new(
                    format!("`{}` is declared more than once", member.value),
                    &member,
                )
                .into())
            };
            match keyword {
                Keyword::Of => {
                    let base = parser.scalar_line("a style name")?;
                    assign(&mut style.base, base, &member)
                }
                Keyword::Citation => {
                    let citation = parser.scalar_line("a style name")?;
                    assign(&mut style.citation, citation, &member)
                }
                Keyword::Font if style.font.is_some() => duplicate(),
                Keyword::Font => {
                    let mut font = FontConfig {
                        position: member.position,
                        ..FontConfig::default()
                    };
                    parser.field_block(&member, &mut font, "a font setting (name, size, colour)", font_field)?;
                    style.font = Some(font);
                    Ok(())
                }
                Keyword::Layout if style.layout.is_some() => duplicate(),
                Keyword::Layout => {
                    let mut layout = LayoutConfig {
                        position: member.position,
                        ..LayoutConfig::default()
                    };
                    parser.field_block(
                        &member,
                        &mut layout,
                        "a layout setting (width, height, margin, spacing)",
                        layout_field,
                    )?;
                    style.layout = Some(layout);
                    Ok(())
                }
                Keyword::Paragraph if style.paragraph.is_some() => duplicate(),
                Keyword::Paragraph => {
                    let mut paragraph = ParagraphConfig {
                        position: member.position,
                        ..ParagraphConfig::default()
                    };
                    parser.field_block(
                        &member,
                        &mut paragraph,
                        "a paragraph setting (indentation)",
                        paragraph_field,
                    )?;
                    style.paragraph = Some(paragraph);
                    Ok(())
                }
                Keyword::Sentence if style.sentence.is_some() => duplicate(),
                Keyword::Sentence => {
                    let mut sentence = SentenceConfig {
                        position: member.position,
                        ..SentenceConfig::default()
                    };
                    parser.field_block(
                        &member,
                        &mut sentence,
                        "a sentence setting (prefix, whitespace, bold, italic)",
                        sentence_field,
                    )?;
                    style.sentence = Some(sentence);
                    Ok(())
                }
                Keyword::Numeration if style.numeration.is_some() => duplicate(),
                Keyword::Numeration => {
                    style.numeration = Some(parser.numeration_block(&member)?);
                    Ok(())
                }
                Keyword::Structure if style.structure.is_some() => duplicate(),
                Keyword::Structure => {
                    style.structure = Some(parser.structure_list(&member)?);
                    Ok(())
                }
                Keyword::Endnotes if style.endnotes.is_some() => duplicate(),
                Keyword::Endnotes => {
                    let mut endnotes = EndnotesConfig {
                        position: member.position,
                        ..EndnotesConfig::default()
                    };
                    parser.field_block(
                        &member,
                        &mut endnotes,
                        "an endnotes setting (allow, before)",
                        endnotes_field,
                    )?;
                    style.endnotes = Some(endnotes);
                    Ok(())
                }
                _ => Err(ParseError::unexpected(STYLE_MEMBERS, &member).into()),
            }
        })?;
        Ok(style)
    }

    fn numeration_block(&mut self, opener: &Token) -> Step<NumerationConfig> {
        let mut numeration = NumerationConfig {
            position: opener.position,
            ..NumerationConfig::default()
        };
        let expected = "a numeration setting (type, display, margin, skip)";
        self.block(opener, |parser, member| {
            let keyword = parser.member_keyword(&member, expected, |keyword| {
                matches!(
                    keyword,
                    Keyword::Type | Keyword::Display | Keyword::Margin | Keyword::Skip
                )
            })?;
            if keyword == Keyword::Skip {
                if !numeration.skip.is_empty() {
                    return Err(ParseError::new("`skip` is declared more than once", &member).into());
                }
                numeration.skip = parser.scalar_list("a page or page span")?;
                return parser.end_of_line();
            }
            let value = parser.scalar_line(&format!("a text after `{keyword}`"))?;
            let slot = match keyword {
                Keyword::Type => &mut numeration.kind,
                Keyword::Display => &mut numeration.display,
                _ => &mut numeration.margin,
            };
            assign(slot, value, &member)
        })?;
        Ok(numeration)
    }

    /// `structure "titlepage", "abstract"`, or a block of such lists
    fn structure_list(&mut self, opener: &Token) -> Step<StructureList> {
        let mut sections: Vec<Scalar> = Vec::new();
        if self.opens_block()? {
            self.block(opener, |parser, _| {
                sections.extend(parser.scalar_list("a section name")?);
                parser.end_of_line()
            })?;
        } else {
            sections = self.scalar_list("a section name")?;
            self.end_of_line()?;
        }
        Ok(StructureList {
            sections,
            position: opener.position,
        })
    }
}

fn is_style_member(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Of
            | Keyword::Font
            | Keyword::Layout
            | Keyword::Paragraph
            | Keyword::Sentence
            | Keyword::Numeration
            | Keyword::Structure
            | Keyword::Citation
            | Keyword::Endnotes
    )
}

fn person_field(person: &mut Person, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Name => Some(&mut person.name),
        Keyword::Firstname => Some(&mut person.firstname),
        Keyword::Lastname => Some(&mut person.lastname),
        Keyword::Role => Some(&mut person.role),
        Keyword::Institution => Some(&mut person.institution),
        _ => None,
    }
}

fn publication_field(publication: &mut Publication, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Title => Some(&mut publication.title),
        Keyword::Venue => Some(&mut publication.venue),
        Keyword::Date => Some(&mut publication.date),
        Keyword::Edition => Some(&mut publication.edition),
        Keyword::Institution => Some(&mut publication.institution),
        Keyword::Chair => Some(&mut publication.chair),
        Keyword::Semester => Some(&mut publication.semester),
        _ => None,
    }
}

fn font_field(font: &mut FontConfig, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Name => Some(&mut font.name),
        Keyword::Size => Some(&mut font.size),
        Keyword::Colour => Some(&mut font.colour),
        _ => None,
    }
}

fn layout_field(layout: &mut LayoutConfig, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Width => Some(&mut layout.width),
        Keyword::Height => Some(&mut layout.height),
        Keyword::Margin => Some(&mut layout.margin),
        Keyword::Spacing => Some(&mut layout.spacing),
        _ => None,
    }
}

fn paragraph_field(paragraph: &mut ParagraphConfig, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Indentation => Some(&mut paragraph.indentation),
        _ => None,
    }
}

fn sentence_field(sentence: &mut SentenceConfig, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Prefix => Some(&mut sentence.prefix),
        Keyword::Whitespace => Some(&mut sentence.whitespace),
        Keyword::Bold => Some(&mut sentence.bold),
        Keyword::Italic => Some(&mut sentence.italic),
        _ => None,
    }
}

fn endnotes_field(endnotes: &mut EndnotesConfig, keyword: Keyword) -> Option<&mut Option<Scalar>> {
    match keyword {
        Keyword::Allow => Some(&mut endnotes.allow),
        Keyword::Before => Some(&mut endnotes.before),
        _ => None,
    }
}
