//! Bibliography sources as declared
//!
//! Every source kind accepts a fixed set of fields; the parser consults
//! [SourceKind::accepts] so a field outside that set is rejected where it is written.

use super::value::{check_content, debug_field, Scalar};
use super::{render_children, ConfigNode};
use crate::pipp::diagnostics::{Severity, Warning, WarningQueue};
use crate::pipp::error::ConfigError;
use crate::pipp::style::PageRange;
use crate::pipp::token::{Keyword, Position};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Book,
    Music,
    Periodical,
    Poem,
    VideoGame,
    WebPage,
}

impl SourceKind {
    pub fn from_keyword(keyword: Keyword) -> Option<SourceKind> {
        match keyword {
            Keyword::Book => Some(SourceKind::Book),
            Keyword::Music => Some(SourceKind::Music),
            Keyword::Periodical => Some(SourceKind::Periodical),
            Keyword::Poem => Some(SourceKind::Poem),
            Keyword::Videogame => Some(SourceKind::VideoGame),
            Keyword::Webpage => Some(SourceKind::WebPage),
            _ => None,
        }
    }

    /// Whether a field keyword belongs to this kind of source
    pub fn accepts(&self, field: Keyword) -> bool {
        use Keyword::*;
        if matches!(field, Id | Author | Title | Year | Url) {
            return true;
        }
        match self {
            SourceKind::Book => matches!(field, Publisher | Edition),
            SourceKind::Music => matches!(field, Album | Label),
            SourceKind::Periodical => matches!(field, Journal | Volume | Issue | Pages | Accessed),
            SourceKind::Poem => matches!(field, Container | Publisher | Edition | Pages),
            SourceKind::VideoGame => matches!(field, Publisher | Platform),
            SourceKind::WebPage => matches!(field, Website | Accessed),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Book => f.write_str("book"),
            SourceKind::Music => f.write_str("music"),
            SourceKind::Periodical => f.write_str("periodical"),
            SourceKind::Poem => f.write_str("poem"),
            SourceKind::VideoGame => f.write_str("videogame"),
            SourceKind::WebPage => f.write_str("webpage"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceKind,
    pub id: Option<Scalar>,
    pub authors: Vec<Scalar>,
    pub title: Option<Scalar>,
    pub publisher: Option<Scalar>,
    pub year: Option<Scalar>,
    pub edition: Option<Scalar>,
    pub container: Option<Scalar>,
    pub journal: Option<Scalar>,
    pub volume: Option<Scalar>,
    pub issue: Option<Scalar>,
    pub pages: Option<Scalar>,
    pub album: Option<Scalar>,
    pub label: Option<Scalar>,
    pub platform: Option<Scalar>,
    pub website: Option<Scalar>,
    pub url: Option<Scalar>,
    pub accessed: Option<Scalar>,
    pub position: Position,
}

impl Source {
    pub fn new(kind: SourceKind, position: Position) -> Self {
        Self {
            kind,
            id: None,
            authors: Vec::new(),
            title: None,
            publisher: None,
            year: None,
            edition: None,
            container: None,
            journal: None,
            volume: None,
            issue: None,
            pages: None,
            album: None,
            label: None,
            platform: None,
            website: None,
            url: None,
            accessed: None,
            position,
        }
    }

    /// Slot of a single-valued field. `author` is a list and has no slot.
    pub fn field_mut(&mut self, field: Keyword) -> Option<&mut Option<Scalar>> {
        let slot = match field {
            Keyword::Id => &mut self.id,
            Keyword::Title => &mut self.title,
            Keyword::Publisher => &mut self.publisher,
            Keyword::Year => &mut self.year,
            Keyword::Edition => &mut self.edition,
            Keyword::Container => &mut self.container,
            Keyword::Journal => &mut self.journal,
            Keyword::Volume => &mut self.volume,
            Keyword::Issue => &mut self.issue,
            Keyword::Pages => &mut self.pages,
            Keyword::Album => &mut self.album,
            Keyword::Label => &mut self.label,
            Keyword::Platform => &mut self.platform,
            Keyword::Website => &mut self.website,
            Keyword::Url => &mut self.url,
            Keyword::Accessed => &mut self.accessed,
            _ => return None,
        };
        Some(slot)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.value.trim())
    }

    fn fields(&self) -> [(&'static str, &Option<Scalar>); 16] {
        [
            ("id", &self.id),
            ("title", &self.title),
            ("publisher", &self.publisher),
            ("year", &self.year),
            ("edition", &self.edition),
            ("container", &self.container),
            ("journal", &self.journal),
            ("volume", &self.volume),
            ("issue", &self.issue),
            ("pages", &self.pages),
            ("album", &self.album),
            ("label", &self.label),
            ("platform", &self.platform),
            ("website", &self.website),
            ("url", &self.url),
            ("accessed", &self.accessed),
        ]
    }

    fn require(&self, field: &Option<Scalar>, name: &str) -> Result<(), ConfigError> {
        if field.is_none() {
            return Err(ConfigError::missing_member(format!(
                "A {} source requires a {name}",
                self.kind
            ))
            .at(self.position));
        }
        Ok(())
    }
}

impl ConfigNode for Source {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for (name, field) in self.fields() {
            check_content(field, name)?;
        }
        for author in &self.authors {
            author.require_content("author")?;
        }

        self.require(&self.title, "title")?;
        match self.kind {
            SourceKind::Book | SourceKind::VideoGame => self.require(&self.publisher, "publisher")?,
            SourceKind::Periodical => self.require(&self.journal, "journal")?,
            SourceKind::WebPage if self.website.is_none() && self.url.is_none() => {
                return Err(ConfigError::missing_member(
                    "A webpage source requires a website or a url",
                )
                .at(self.position));
            }
            _ => {}
        }

        for (name, field) in [
            ("volume", &self.volume),
            ("issue", &self.issue),
            ("edition", &self.edition),
        ] {
            if let Some(number) = field {
                number.parse_positive(name)?;
            }
        }
        if let Some(pages) = &self.pages {
            pages.parse::<PageRange>()?;
        }
        if let Some(accessed) = &self.accessed {
            if accessed.parse_date()?.is_none() {
                return Err(ConfigError::incorrect_format(
                    "An access date must be a date (dd/mm/yyyy)",
                )
                .at(accessed.position));
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        if self.authors.is_empty() {
            warnings.push(
                Warning::missing_member(
                    Severity::Low,
                    format!("The {} source {} names no author", self.kind, describe(self)),
                )
                .at(self.position),
            );
        }
        if self.kind == SourceKind::WebPage && self.accessed.is_none() {
            warnings.push(
                Warning::missing_member(
                    Severity::Low,
                    format!("The webpage {} has no access date", describe(self)),
                )
                .at(self.position),
            );
        }
    }

    fn render_debug(&self) -> String {
        let mut fields: Vec<String> = Vec::new();
        if !self.authors.is_empty() {
            let names: Vec<&str> = self.authors.iter().map(Scalar::as_str).collect();
            fields.push(format!("author: {:?}", names));
        }
        fields.extend(
            self.fields()
                .into_iter()
                .filter_map(|(name, field)| debug_field(name, field)),
        );
        format!("Source::{}({})", self.kind, fields.join(", "))
    }
}

fn describe(source: &Source) -> String {
    match (&source.id, &source.title) {
        (Some(id), _) => format!("\"{}\"", id.value),
        (None, Some(title)) => format!("\"{}\"", title.value),
        (None, None) => format!("at {}", source.position),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bibliography {
    pub sources: Vec<Source>,
    pub position: Option<Position>,
}

impl Bibliography {
    pub fn find(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.id() == Some(id))
    }
}

impl ConfigNode for Bibliography {
    fn validate_errors(&self) -> Result<(), ConfigError> {
        for source in &self.sources {
            source.validate_errors()?;
        }
        let mut seen: HashMap<&str, Position> = HashMap::new();
        for source in &self.sources {
            if let (Some(id), Some(scalar)) = (source.id(), &source.id) {
                if let Some(first) = seen.insert(id, scalar.position) {
                    return Err(ConfigError::illegal_configuration(format!(
                        "The source id \"{id}\" is already used at {first}"
                    ))
                    .at(scalar.position));
                }
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, warnings: &mut WarningQueue) {
        for source in &self.sources {
            source.validate_warnings(warnings);
        }
    }

    fn render_debug(&self) -> String {
        render_children("Bibliography", self.sources.iter().map(|s| s.render_debug()))
    }
}
