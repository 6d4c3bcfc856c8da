//! Character-driven scanner
//!
//!     The scanner is a small state machine fed one character at a time through
//!     [Scanner::scan]. Completed lexemes are queued internally and handed out with
//!     [Scanner::next_token]; the bridge pulls characters only while the parser needs more
//!     tokens.
//!
//! States
//!
//!     LineStart: counting indentation (a tab or four spaces per unit). The first
//!         significant character compares the line's depth to the previous line and emits
//!         an INDENT token on increase.
//!     Comment: a `#` in the first column swallows the rest of the line.
//!     Between: whitespace between lexemes on a line.
//!     Keyword: a run of lowercase letters.
//!     Text: a quoted text; `\` switches to Escape for one character.
//!
//!     Lines that produce no token (blank, whitespace only, comment) are invisible: they
//!     emit no NEW_LINE and leave the depth untouched.

use super::token::{Position, Token, TokenType};
use std::collections::VecDeque;
use thiserror::Error;

/// Spaces that make up one indentation unit. A tab always counts one unit.
pub const SPACES_PER_INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character {character:?} at {position}")]
    UnexpectedCharacter { character: char, position: Position },

    #[error("invalid escape sequence `{sequence}` in text \"{value}\" at {position}")]
    InvalidEscape {
        sequence: String,
        value: String,
        position: Position,
    },

    #[error("unterminated text \"{value}\" starting at {position}")]
    UnterminatedText { value: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::InvalidEscape { position, .. }
            | LexError::UnterminatedText { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    Comment,
    Between,
    Keyword,
    Text,
    Escape,
}

#[derive(Debug)]
pub struct Scanner {
    state: State,
    buffer: String,
    line: usize,
    column: usize,
    tabs: usize,
    spaces: usize,
    line_depth: usize,
    previous_depth: usize,
    line_has_tokens: bool,
    token_start: Position,
    ready: VecDeque<Token>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            state: State::LineStart,
            buffer: String::new(),
            line: 1,
            column: 0,
            tabs: 0,
            spaces: 0,
            line_depth: 0,
            previous_depth: 0,
            line_has_tokens: false,
            token_start: Position::default(),
            ready: VecDeque::new(),
        }
    }

    /// Consume exactly one character of input
    pub fn scan(&mut self, character: char) -> Result<(), LexError> {
        if character == '\r' {
            return Ok(());
        }
        self.column += 1;
        let position = Position::new(self.line, self.column);

        match self.state {
            State::LineStart => self.line_start(character, position),
            State::Comment => {
                if character == '\n' {
                    self.end_line();
                }
                Ok(())
            }
            State::Between => self.between(character, position),
            State::Keyword => self.keyword(character, position),
            State::Text => {
                self.text(character);
                Ok(())
            }
            State::Escape => self.escape(character, position),
        }
    }

    /// Signal end of input: flush a pending keyword and close the last line.
    pub fn finish(&mut self) -> Result<(), LexError> {
        match self.state {
            State::Text | State::Escape => {
                return Err(LexError::UnterminatedText {
                    value: self.buffer.clone(),
                    position: self.token_start,
                })
            }
            State::Keyword => self.flush_keyword(),
            _ => {}
        }

        if self.line_has_tokens {
            let position = Position::new(self.line, self.column + 1);
            self.submit_token(TokenType::NewLine, String::new(), position);
            self.end_line();
        }
        self.state = State::LineStart;
        Ok(())
    }

    /// Take the oldest completed token
    pub fn next_token(&mut self) -> Option<Token> {
        self.ready.pop_front()
    }

    pub fn has_tokens(&self) -> bool {
        !self.ready.is_empty()
    }

    fn line_start(&mut self, character: char, position: Position) -> Result<(), LexError> {
        match character {
            '\t' => self.tabs += 1,
            ' ' => self.spaces += 1,
            '\n' => self.end_line(),
            '#' if position.column == 1 => self.state = State::Comment,
            _ => {
                let depth = self.tabs + self.spaces / SPACES_PER_INDENT;
                self.line_depth = depth;
                if depth > self.previous_depth {
                    self.submit_token(
                        TokenType::Indent,
                        depth.to_string(),
                        Position::new(self.line, 1),
                    );
                }
                self.previous_depth = depth;
                self.state = State::Between;
                return self.between(character, position);
            }
        }
        Ok(())
    }

    fn between(&mut self, character: char, position: Position) -> Result<(), LexError> {
        match character {
            ' ' | '\t' => {}
            '\n' => {
                self.submit_token(TokenType::NewLine, String::new(), position);
                self.end_line();
            }
            ',' => self.submit_token(TokenType::ListSeparator, ",".to_string(), position),
            '"' => {
                self.token_start = position;
                self.buffer.clear();
                self.state = State::Text;
            }
            'a'..='z' => {
                self.token_start = position;
                self.buffer.clear();
                self.buffer.push(character);
                self.state = State::Keyword;
            }
            _ => return Err(LexError::UnexpectedCharacter { character, position }),
        }
        Ok(())
    }

    fn keyword(&mut self, character: char, position: Position) -> Result<(), LexError> {
        match character {
            'a'..='z' => self.buffer.push(character),
            ' ' | '\t' => {
                self.flush_keyword();
                self.state = State::Between;
            }
            '\n' | ',' | '"' => {
                self.flush_keyword();
                self.state = State::Between;
                return self.between(character, position);
            }
            _ => return Err(LexError::UnexpectedCharacter { character, position }),
        }
        Ok(())
    }

    fn text(&mut self, character: char) {
        match character {
            '"' => {
                let value = std::mem::take(&mut self.buffer);
                self.submit_token(TokenType::Text, value, self.token_start);
                self.state = State::Between;
            }
            '\\' => self.state = State::Escape,
            '\n' => {
                // A raw line break inside a text reads as one space
                if !self.buffer.ends_with(' ') {
                    self.buffer.push(' ');
                }
                self.line += 1;
                self.column = 0;
            }
            _ => self.buffer.push(character),
        }
    }

    fn escape(&mut self, character: char, position: Position) -> Result<(), LexError> {
        let unescaped = match character {
            '"' => '"',
            '\\' => '\\',
            'n' => '\n',
            't' => '\t',
            _ => {
                return Err(LexError::InvalidEscape {
                    sequence: format!("\\{}", character.escape_default()),
                    value: self.buffer.clone(),
                    position,
                })
            }
        };
        self.buffer.push(unescaped);
        self.state = State::Text;
        Ok(())
    }

    fn flush_keyword(&mut self) {
        let value = std::mem::take(&mut self.buffer);
        self.submit_token(TokenType::Keyword, value, self.token_start);
    }

    fn submit_token(&mut self, kind: TokenType, value: String, position: Position) {
        self.ready
            .push_back(Token::new(kind, value, position, self.line_depth));
        self.line_has_tokens = true;
    }

    fn end_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.tabs = 0;
        self.spaces = 0;
        self.line_has_tokens = false;
        self.state = State::LineStart;
    }
}

/// Scan a whole source eagerly
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new();
    let mut tokens = Vec::new();
    for character in source.chars() {
        scanner.scan(character)?;
        while let Some(token) = scanner.next_token() {
            tokens.push(token);
        }
    }
    scanner.finish()?;
    while let Some(token) = scanner.next_token() {
        tokens.push(token);
    }
    Ok(tokens)
}
