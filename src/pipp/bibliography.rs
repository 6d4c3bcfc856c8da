//! Typed bibliography subjects
//!
//!     A declared [Source] becomes a [Work]: a closed set of variants, each holding the
//!     parsed fields its citation form needs next to the attributes every work shares.
//!     [Work::to_bibliography] composes those fields with the rules of a style guide into
//!     one entry; the entry keeps a sort key so the processor can order the bibliography
//!     by primary author surname and then title.

use crate::pipp::ast::{Scalar, Source, SourceKind};
use crate::pipp::document::{BibliographyEntry, Span};
use crate::pipp::error::ConfigError;
use crate::pipp::style::text::merge_spans;
use crate::pipp::style::{PageRange, StyleGuide};
use chrono::NaiveDate;

/// A personal name split into given names and surname
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub given: Option<String>,
    pub surname: String,
}

impl Name {
    /// The last word is the surname; a single word is a surname alone
    pub fn parse(text: &str) -> Name {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        match text.rsplit_once(' ') {
            Some((given, surname)) => Name {
                given: Some(given.to_string()),
                surname: surname.to_string(),
            },
            None => Name {
                given: None,
                surname: text,
            },
        }
    }

    pub fn full(&self) -> String {
        match &self.given {
            Some(given) => format!("{} {}", given, self.surname),
            None => self.surname.clone(),
        }
    }

    /// `Surname, Given`
    pub fn inverted(&self) -> String {
        match &self.given {
            Some(given) => format!("{}, {}", self.surname, given),
            None => self.surname.clone(),
        }
    }
}

/// Attributes every work has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    pub id: Option<String>,
    pub authors: Vec<Name>,
    pub title: String,
    pub year: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub common: Common,
    pub publisher: String,
    pub edition: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Music {
    pub common: Common,
    pub album: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periodical {
    pub common: Common,
    pub journal: String,
    pub volume: Option<u32>,
    pub issue: Option<u32>,
    pub pages: Option<PageRange>,
    pub accessed: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    pub common: Common,
    pub container: Option<String>,
    pub publisher: Option<String>,
    pub edition: Option<u32>,
    pub pages: Option<PageRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGame {
    pub common: Common,
    pub publisher: String,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPage {
    pub common: Common,
    pub website: Option<String>,
    pub accessed: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Work {
    Book(Book),
    Music(Music),
    Periodical(Periodical),
    Poem(Poem),
    VideoGame(VideoGame),
    WebPage(WebPage),
}

fn text(field: &Option<Scalar>) -> Option<String> {
    field.as_ref().map(|scalar| scalar.value.trim().to_string())
}

fn required(source: &Source, field: &Option<Scalar>, name: &str) -> Result<String, ConfigError> {
    text(field).ok_or_else(|| {
        ConfigError::missing_member(format!("A {} source requires a {name}", source.kind))
            .at(source.position)
    })
}

fn number(field: &Option<Scalar>, name: &str) -> Result<Option<u32>, ConfigError> {
    field
        .as_ref()
        .map(|scalar| scalar.parse_positive(name))
        .transpose()
}

fn pages(field: &Option<Scalar>) -> Result<Option<PageRange>, ConfigError> {
    field.as_ref().map(Scalar::parse::<PageRange>).transpose()
}

fn date(field: &Option<Scalar>) -> Result<Option<NaiveDate>, ConfigError> {
    Ok(match field {
        Some(scalar) => scalar.parse_date()?,
        None => None,
    })
}

impl Work {
    pub fn from_source(source: &Source) -> Result<Work, ConfigError> {
        let common = Common {
            id: source.id().map(str::to_string),
            authors: source
                .authors
                .iter()
                .map(|author| Name::parse(&author.value))
                .collect(),
            title: required(source, &source.title, "title")?,
            year: text(&source.year),
            url: text(&source.url),
        };

        let work = match source.kind {
            SourceKind::Book => Work::Book(Book {
                publisher: required(source, &source.publisher, "publisher")?,
                edition: number(&source.edition, "edition")?,
                common,
            }),
            SourceKind::Music => Work::Music(Music {
                album: text(&source.album),
                label: text(&source.label),
                common,
            }),
            SourceKind::Periodical => Work::Periodical(Periodical {
                journal: required(source, &source.journal, "journal")?,
                volume: number(&source.volume, "volume")?,
                issue: number(&source.issue, "issue")?,
                pages: pages(&source.pages)?,
                accessed: date(&source.accessed)?,
                common,
            }),
            SourceKind::Poem => Work::Poem(Poem {
                container: text(&source.container),
                publisher: text(&source.publisher),
                edition: number(&source.edition, "edition")?,
                pages: pages(&source.pages)?,
                common,
            }),
            SourceKind::VideoGame => Work::VideoGame(VideoGame {
                publisher: required(source, &source.publisher, "publisher")?,
                platform: text(&source.platform),
                common,
            }),
            SourceKind::WebPage => Work::WebPage(WebPage {
                website: text(&source.website),
                accessed: date(&source.accessed)?,
                common,
            }),
        };
        Ok(work)
    }

    pub fn common(&self) -> &Common {
        match self {
            Work::Book(work) => &work.common,
            Work::Music(work) => &work.common,
            Work::Periodical(work) => &work.common,
            Work::Poem(work) => &work.common,
            Work::VideoGame(work) => &work.common,
            Work::WebPage(work) => &work.common,
        }
    }

    /// Whether the title stands alone (italics) rather than inside a container (quotes)
    fn is_self_contained(&self) -> bool {
        match self {
            Work::Book(_) | Work::VideoGame(_) => true,
            Work::Music(music) => music.album.is_none(),
            Work::Poem(poem) => poem.container.is_none(),
            Work::Periodical(_) => false,
            Work::WebPage(page) => page.website.is_none(),
        }
    }

    /// Primary author surname (or the title when there is none), then the title
    pub fn sort_key(&self) -> (String, String) {
        let common = self.common();
        let title = common.title.to_lowercase();
        match common.authors.first() {
            Some(author) => (author.surname.to_lowercase(), title),
            None => (title.clone(), title),
        }
    }

    /// Reference placed in the text after cited material
    pub fn in_text(&self, guide: StyleGuide, page: Option<&str>) -> String {
        let common = self.common();
        guide.in_text_citation(&common.authors, &common.title, page)
    }

    pub fn to_bibliography(&self, guide: StyleGuide) -> BibliographyEntry {
        let spans = match guide {
            StyleGuide::Mla9 => self.mla9_entry(guide),
            StyleGuide::Pipp => self.pipp_entry(guide),
        };
        BibliographyEntry {
            id: self.common().id.clone(),
            spans: merge_spans(spans),
            sort_key: self.sort_key(),
        }
    }

    /// Container title and the publication details that follow the work's own title
    fn container(&self) -> Option<&str> {
        match self {
            Work::Music(music) => music.album.as_deref(),
            Work::Periodical(periodical) => Some(&periodical.journal),
            Work::Poem(poem) => poem.container.as_deref(),
            Work::WebPage(page) => page.website.as_deref(),
            Work::Book(_) | Work::VideoGame(_) => None,
        }
    }

    fn mla9_details(&self, guide: StyleGuide) -> (Vec<String>, Option<String>) {
        let common = self.common();
        let mut details = Vec::new();
        let mut trailer = None;
        match self {
            Work::Book(book) => {
                details.extend(book.edition.map(|edition| format!("{} ed.", ordinal(edition))));
                details.push(book.publisher.clone());
                details.extend(common.year.clone());
            }
            Work::Music(music) => {
                details.extend(music.label.clone());
                details.extend(common.year.clone());
            }
            Work::Periodical(periodical) => {
                details.extend(periodical.volume.map(|volume| format!("vol. {volume}")));
                details.extend(periodical.issue.map(|issue| format!("no. {issue}")));
                details.extend(common.year.clone());
                details.extend(periodical.pages.map(page_reference));
                trailer = periodical
                    .accessed
                    .map(|day| format!("Accessed {}.", guide.date_to_string(day)));
            }
            Work::Poem(poem) => {
                details.extend(poem.edition.map(|edition| format!("{} ed.", ordinal(edition))));
                details.extend(poem.publisher.clone());
                details.extend(common.year.clone());
                details.extend(poem.pages.map(page_reference));
            }
            Work::VideoGame(game) => {
                details.extend(game.platform.as_ref().map(|platform| format!("{platform} version")));
                details.push(game.publisher.clone());
                details.extend(common.year.clone());
            }
            Work::WebPage(page) => {
                details.extend(common.year.clone());
                trailer = page
                    .accessed
                    .map(|day| format!("Accessed {}.", guide.date_to_string(day)));
            }
        }
        details.extend(common.url.clone());
        (details, trailer)
    }

    fn mla9_entry(&self, guide: StyleGuide) -> Vec<Span> {
        let common = self.common();
        let mut spans = Vec::new();
        if !common.authors.is_empty() {
            spans.push(Span::regular(close_sentence(&guide.author_list(&common.authors))));
        }

        if self.is_self_contained() {
            spans.push(Span::italic(common.title.clone()));
            spans.push(Span::regular(". "));
        } else {
            spans.push(Span::regular(format!("\"{}\" ", with_period(&common.title))));
        }

        let (details, trailer) = self.mla9_details(guide);
        match self.container() {
            Some(container) => {
                spans.push(Span::italic(container));
                if details.is_empty() {
                    spans.push(Span::regular("."));
                } else {
                    spans.push(Span::regular(format!(", {}.", details.join(", "))));
                }
            }
            None if !details.is_empty() => {
                spans.push(Span::regular(format!("{}.", details.join(", "))));
            }
            None => {}
        }
        if let Some(trailer) = trailer {
            spans.push(Span::regular(format!(" {trailer}")));
        }
        trim_trailing(spans)
    }

    fn pipp_details(&self, guide: StyleGuide) -> Vec<String> {
        let common = self.common();
        let mut details = Vec::new();
        match self {
            Work::Book(book) => {
                details.push(book.publisher.clone());
                details.extend(book.edition.map(|edition| format!("{} ed.", ordinal(edition))));
            }
            Work::Music(music) => details.extend(music.label.clone()),
            Work::Periodical(periodical) => {
                let mut issue = String::new();
                if let Some(volume) = periodical.volume {
                    issue.push_str(&volume.to_string());
                }
                if let Some(number) = periodical.issue {
                    issue.push_str(&format!("({number})"));
                }
                if !issue.is_empty() {
                    details.push(issue);
                }
                details.extend(periodical.pages.map(page_reference));
            }
            Work::Poem(poem) => {
                details.extend(poem.publisher.clone());
                details.extend(poem.pages.map(page_reference));
            }
            Work::VideoGame(game) => {
                details.push(game.publisher.clone());
                details.extend(game.platform.clone());
            }
            Work::WebPage(_) => {}
        }
        details.extend(common.url.clone());
        let accessed = match self {
            Work::Periodical(periodical) => periodical.accessed,
            Work::WebPage(page) => page.accessed,
            _ => None,
        };
        details.extend(accessed.map(|day| format!("accessed {}", guide.date_to_string(day))));
        details
    }

    fn pipp_entry(&self, guide: StyleGuide) -> Vec<Span> {
        let common = self.common();
        let mut spans = Vec::new();
        let year = common.year.as_ref().map(|year| format!(" ({year})"));
        if common.authors.is_empty() {
            spans.push(Span::italic(common.title.clone()));
            spans.push(Span::regular(format!("{}. ", year.unwrap_or_default())));
        } else {
            spans.push(Span::regular(format!(
                "{}{}. ",
                guide.author_list(&common.authors),
                year.unwrap_or_default()
            )));
            if self.is_self_contained() {
                spans.push(Span::italic(common.title.clone()));
            } else {
                spans.push(Span::regular(common.title.clone()));
            }
            spans.push(Span::regular(". "));
        }

        if let Some(container) = self.container() {
            spans.push(Span::regular("In "));
            spans.push(Span::italic(container));
            spans.push(Span::regular(". "));
        }
        let details = self.pipp_details(guide);
        if !details.is_empty() {
            spans.push(Span::regular(format!("{}.", details.join(", "))));
        }
        trim_trailing(spans)
    }
}

/// Sort entries by primary author surname, then title
pub fn sort_entries(entries: &mut [BibliographyEntry]) {
    entries.sort_by(|left, right| left.sort_key.cmp(&right.sort_key));
}

fn ordinal(number: u32) -> String {
    let suffix = match (number % 10, number % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{number}{suffix}")
}

fn page_reference(pages: PageRange) -> String {
    if pages.first == pages.last {
        format!("p. {}", pages.first)
    } else {
        format!("pp. {}-{}", pages.first, pages.last)
    }
}

fn with_period(text: &str) -> String {
    if text.ends_with(['.', '?', '!']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

/// `text.` followed by one space
fn close_sentence(text: &str) -> String {
    format!("{} ", with_period(text))
}

fn trim_trailing(mut spans: Vec<Span>) -> Vec<Span> {
    if let Some(last) = spans.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::document::Emphasis;
    use crate::pipp::token::Position;

    fn scalar(value: &str) -> Option<Scalar> {
        Some(Scalar::new(value, Position::new(1, 1)))
    }

    fn source(kind: SourceKind, authors: &[&str], title: &str) -> Source {
        let mut source = Source::new(kind, Position::new(1, 1));
        source.authors = authors
            .iter()
            .map(|author| Scalar::new(*author, Position::new(1, 1)))
            .collect();
        source.title = scalar(title);
        source
    }

    #[test]
    fn test_name_parse() {
        let name = Name::parse("Edgar  Allan Poe");
        assert_eq!(name.given.as_deref(), Some("Edgar Allan"));
        assert_eq!(name.surname, "Poe");
        assert_eq!(name.inverted(), "Poe, Edgar Allan");
        assert_eq!(Name::parse("Homer").inverted(), "Homer");
    }

    #[test]
    fn test_mla9_book() {
        let mut book = source(SourceKind::Book, &["Jane Austen"], "Pride and Prejudice");
        book.publisher = scalar("T. Egerton");
        book.edition = scalar("3");
        book.year = scalar("1813");
        let entry = Work::from_source(&book).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(
            entry.text(),
            "Austen, Jane. Pride and Prejudice. 3rd ed., T. Egerton, 1813."
        );
        assert_eq!(entry.spans[1], Span::italic("Pride and Prejudice"));
    }

    #[test]
    fn test_mla9_poem() {
        let mut poem = source(SourceKind::Poem, &["Edgar Allan Poe"], "The Raven");
        poem.container = scalar("The American Review");
        poem.year = scalar("1845");
        poem.pages = scalar("143-145");
        let entry = Work::from_source(&poem).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(
            entry.text(),
            "Poe, Edgar Allan. \"The Raven.\" The American Review, 1845, pp. 143-145."
        );
        assert!(entry
            .spans
            .iter()
            .any(|span| span.emphasis == Emphasis::Italic && span.text == "The American Review"));
    }

    #[test]
    fn test_mla9_periodical_and_webpage() {
        let mut article = source(SourceKind::Periodical, &["Ada Byron", "Charles Babbage"], "Notes");
        article.journal = scalar("Scientific Memoirs");
        article.volume = scalar("3");
        article.issue = scalar("1");
        article.year = scalar("1843");
        article.pages = scalar("666-731");
        let entry = Work::from_source(&article).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(
            entry.text(),
            "Byron, Ada, and Charles Babbage. \"Notes.\" Scientific Memoirs, vol. 3, no. 1, 1843, pp. 666-731."
        );

        let mut page = source(SourceKind::WebPage, &[], "Style Center");
        page.website = scalar("MLA");
        page.year = scalar("2023");
        page.url = scalar("style.mla.org");
        page.accessed = scalar("03/06/2023");
        let entry = Work::from_source(&page).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(
            entry.text(),
            "\"Style Center.\" MLA, 2023, style.mla.org. Accessed 3 June 2023."
        );
    }

    #[test]
    fn test_mla9_game_and_music() {
        let mut game = source(SourceKind::VideoGame, &["Nintendo"], "Tetris");
        game.platform = scalar("Game Boy");
        game.publisher = scalar("Nintendo");
        game.year = scalar("1989");
        let entry = Work::from_source(&game).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(entry.text(), "Nintendo. Tetris. Game Boy version, Nintendo, 1989.");

        let mut song = source(SourceKind::Music, &["Beatles"], "Yesterday");
        song.album = scalar("Help!");
        song.label = scalar("Parlophone");
        song.year = scalar("1965");
        let entry = Work::from_source(&song).unwrap().to_bibliography(StyleGuide::Mla9);
        assert_eq!(entry.text(), "Beatles. \"Yesterday.\" Help!, Parlophone, 1965.");
    }

    #[test]
    fn test_pipp_book() {
        let mut book = source(SourceKind::Book, &["Jane Austen"], "Emma");
        book.publisher = scalar("John Murray");
        book.year = scalar("1815");
        let entry = Work::from_source(&book).unwrap().to_bibliography(StyleGuide::Pipp);
        assert_eq!(entry.text(), "Jane Austen (1815). Emma. John Murray.");
    }

    #[test]
    fn test_sorting() {
        let mut poe = source(SourceKind::Poem, &["Edgar Allan Poe"], "The Raven");
        poe.id = scalar("poe");
        let mut austen = source(SourceKind::Book, &["Jane Austen"], "Emma");
        austen.publisher = scalar("John Murray");
        let anonymous = source(SourceKind::Poem, &[], "Beowulf");

        let mut entries: Vec<BibliographyEntry> = [poe, austen, anonymous]
            .iter()
            .map(|source| Work::from_source(source).unwrap().to_bibliography(StyleGuide::Mla9))
            .collect();
        sort_entries(&mut entries);
        let keys: Vec<&str> = entries.iter().map(|e| e.sort_key.0.as_str()).collect();
        assert_eq!(keys, vec!["austen", "beowulf", "poe"]);
        assert_eq!(entries[2].id.as_deref(), Some("poe"));
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(23), "23rd");
    }
}
