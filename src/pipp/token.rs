//! Token model shared by the scanner, the bridge and the parser
//!
//!     The lexical alphabet is deliberately small: texts, keywords, indentation increases,
//!     line ends and list separators. Everything else about the document's shape is
//!     inferred by the parser.
//!
//! Dedent
//!
//!     There is no dedent token. Every token records the indentation depth of the line it
//!     starts on, and the parser closes a block as soon as it looks ahead at a token whose
//!     depth is lower than the block's. End of input closes every block that is still open.
//!
//! Keywords
//!
//!     The scanner emits any run of lowercase letters as a keyword lexeme. Whether the word
//!     belongs to the language is decided by [Keyword::recognize], a logos lexer over the
//!     closed vocabulary.

use logos::Logos;
use std::fmt;

/// Represents a position in a pipp source (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// The closed set of lexeme classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Text,
    Keyword,
    Indent,
    NewLine,
    ListSeparator,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Text => "text",
            TokenType::Keyword => "keyword",
            TokenType::Indent => "indentation",
            TokenType::NewLine => "end of line",
            TokenType::ListSeparator => "list separator",
        };
        f.write_str(name)
    }
}

/// A completed lexeme. Immutable once the scanner submits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
    pub position: Position,
    /// Indentation depth of the line the token starts on
    pub indent: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, position: Position, indent: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
            indent,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenType::Text
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == TokenType::Keyword
    }

    pub fn is_indent(&self) -> bool {
        self.kind == TokenType::Indent
    }

    pub fn is_new_line(&self) -> bool {
        self.kind == TokenType::NewLine
    }

    pub fn is_separator(&self) -> bool {
        self.kind == TokenType::ListSeparator
    }

    /// The keyword this token spells, if it is a keyword of the language
    pub fn keyword(&self) -> Option<Keyword> {
        if self.is_keyword() {
            Keyword::recognize(&self.value)
        } else {
            None
        }
    }

    /// Human readable form used in diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenType::Text => format!("text \"{}\"", self.value),
            TokenType::Keyword => format!("`{}`", self.value),
            TokenType::Indent => format!("indentation to depth {}", self.value),
            TokenType::NewLine => "end of line".to_string(),
            TokenType::ListSeparator => "`,`".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenType::Text => write!(f, "TEXT({:?})@{}", self.value, self.position),
            TokenType::Keyword => write!(f, "KEYWORD({})@{}", self.value, self.position),
            TokenType::Indent => write!(f, "INDENT({})@{}", self.value, self.position),
            TokenType::NewLine => write!(f, "NEW_LINE@{}", self.position),
            TokenType::ListSeparator => write!(f, "LIST_SEPARATOR@{}", self.position),
        }
    }
}

/// Every keyword of the language
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Top-level sections
    #[token("version")]
    Version,
    #[token("type")]
    Type,
    #[token("title")]
    Title,
    #[token("author")]
    Author,
    #[token("assessor")]
    Assessor,
    #[token("publication")]
    Publication,
    #[token("style")]
    Style,
    #[token("chapter")]
    Chapter,
    #[token("paragraph")]
    Paragraph,
    #[token("abstract")]
    Abstract,
    #[token("preface")]
    Preface,
    #[token("acknowledgements")]
    Acknowledgements,
    #[token("appendix")]
    Appendix,
    #[token("bibliography")]
    Bibliography,
    #[token("header")]
    Header,
    #[token("blank")]
    Blank,
    #[token("image")]
    Image,

    // People
    #[token("name")]
    Name,
    #[token("firstname")]
    Firstname,
    #[token("lastname")]
    Lastname,
    #[token("role")]
    Role,
    #[token("institution")]
    Institution,

    // Publication
    #[token("venue")]
    Venue,
    #[token("date")]
    Date,
    #[token("edition")]
    Edition,
    #[token("chair")]
    Chair,
    #[token("semester")]
    Semester,

    // Style
    #[token("of")]
    Of,
    #[token("font")]
    Font,
    #[token("size")]
    Size,
    #[token("colour")]
    Colour,
    #[token("layout")]
    Layout,
    #[token("width")]
    Width,
    #[token("height")]
    Height,
    #[token("margin")]
    Margin,
    #[token("spacing")]
    Spacing,
    #[token("indentation")]
    Indentation,
    #[token("sentence")]
    Sentence,
    #[token("prefix")]
    Prefix,
    #[token("whitespace")]
    Whitespace,
    #[token("bold")]
    Bold,
    #[token("italic")]
    Italic,
    #[token("numeration")]
    Numeration,
    #[token("display")]
    Display,
    #[token("skip")]
    Skip,
    #[token("structure")]
    Structure,
    #[token("citation")]
    Citation,
    #[token("endnotes")]
    Endnotes,
    #[token("allow")]
    Allow,
    #[token("before")]
    Before,

    // Sentence runs
    #[token("emphasise")]
    Emphasise,
    #[token("work")]
    Work,
    #[token("quote")]
    Quote,
    #[token("note")]
    Note,
    #[token("page")]
    Page,

    // Bibliography sources and their fields
    #[token("id")]
    Id,
    #[token("book")]
    Book,
    #[token("music")]
    Music,
    #[token("periodical")]
    Periodical,
    #[token("poem")]
    Poem,
    #[token("videogame")]
    Videogame,
    #[token("webpage")]
    Webpage,
    #[token("publisher")]
    Publisher,
    #[token("year")]
    Year,
    #[token("container")]
    Container,
    #[token("journal")]
    Journal,
    #[token("volume")]
    Volume,
    #[token("issue")]
    Issue,
    #[token("pages")]
    Pages,
    #[token("album")]
    Album,
    #[token("label")]
    Label,
    #[token("platform")]
    Platform,
    #[token("website")]
    Website,
    #[token("url")]
    Url,
    #[token("accessed")]
    Accessed,
}

impl Keyword {
    /// Recognize a whole word as a keyword. Prefixes of longer words do not count.
    pub fn recognize(word: &str) -> Option<Keyword> {
        let mut lexer = Keyword::lexer(word);
        match lexer.next() {
            Some(Ok(keyword)) if lexer.span() == (0..word.len()) => Some(keyword),
            _ => None,
        }
    }

    /// Keywords that may open a top-level section
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            Keyword::Version
                | Keyword::Type
                | Keyword::Title
                | Keyword::Author
                | Keyword::Assessor
                | Keyword::Publication
                | Keyword::Style
                | Keyword::Chapter
                | Keyword::Paragraph
                | Keyword::Abstract
                | Keyword::Preface
                | Keyword::Acknowledgements
                | Keyword::Appendix
                | Keyword::Bibliography
                | Keyword::Header
                | Keyword::Blank
                | Keyword::Image
        )
    }

    /// Keywords that introduce a run inside a sentence
    pub fn is_run(&self) -> bool {
        matches!(
            self,
            Keyword::Emphasise
                | Keyword::Bold
                | Keyword::Work
                | Keyword::Quote
                | Keyword::Note
                | Keyword::Citation
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Variant names are the keywords with a capital first letter
        f.write_str(&format!("{:?}", self).to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_keywords() {
        assert_eq!(Keyword::recognize("author"), Some(Keyword::Author));
        assert_eq!(Keyword::recognize("firstname"), Some(Keyword::Firstname));
        assert_eq!(Keyword::recognize("videogame"), Some(Keyword::Videogame));
        assert_eq!(Keyword::recognize("page"), Some(Keyword::Page));
        assert_eq!(Keyword::recognize("pages"), Some(Keyword::Pages));
        assert_eq!(Keyword::recognize("image"), Some(Keyword::Image));
        assert_eq!(Keyword::recognize("blank"), Some(Keyword::Blank));
    }

    #[test]
    fn test_recognize_rejects_partial_words() {
        assert_eq!(Keyword::recognize("authors"), None);
        assert_eq!(Keyword::recognize("auth"), None);
        assert_eq!(Keyword::recognize(""), None);
        assert_eq!(Keyword::recognize("titlepage"), None);
    }

    #[test]
    fn test_keyword_display_is_source_spelling() {
        assert_eq!(Keyword::Acknowledgements.to_string(), "acknowledgements");
        assert_eq!(Keyword::Firstname.to_string(), "firstname");
        assert_eq!(Keyword::Webpage.to_string(), "webpage");
    }

    #[test]
    fn test_keyword_classes() {
        assert!(Keyword::Bibliography.is_section());
        assert!(!Keyword::Name.is_section());
        assert!(Keyword::Header.is_section());
        assert!(Keyword::Image.is_section());
        assert!(Keyword::Citation.is_run());
        assert!(!Keyword::Page.is_run());
    }

    #[test]
    fn test_token_predicates() {
        let token = Token::new(TokenType::Keyword, "title", Position::new(1, 1), 0);
        assert!(token.is_keyword());
        assert!(!token.is_text());
        assert_eq!(token.keyword(), Some(Keyword::Title));

        let text = Token::new(TokenType::Text, "title", Position::new(1, 7), 0);
        assert_eq!(text.keyword(), None);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenType::Text, "Hi", Position::new(2, 5), 1);
        assert_eq!(token.to_string(), "TEXT(\"Hi\")@2:5");
        let indent = Token::new(TokenType::Indent, "1", Position::new(2, 1), 1);
        assert_eq!(indent.to_string(), "INDENT(1)@2:1");
    }
}
