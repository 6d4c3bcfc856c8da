//! Token queue between the scanner and the parser
//!
//!     The bridge owns one compilation run. It reads source characters lazily: tokens are
//!     only scanned when the parser asks for them, either by consuming the next one or by
//!     looking a few tokens ahead. The queue itself is a plain FIFO and can also be filled
//!     directly, which is how tests feed hand-built token streams to the parser.
//!
//!     A run goes: version gate, parse, validation, processing. [compile_str] and
//!     [compile_file] drive all of it and hand back the document plus every warning.

use super::ast::Configuration;
use super::diagnostics::WarningQueue;
use super::document::DocumentModel;
use super::error::PippError;
use super::parsing::Parser;
use super::processor::{self, Processor};
use super::scanner::{LexError, Scanner};
use super::token::{Keyword, Token};
use std::collections::VecDeque;
use std::path::Path;
use std::str::Chars;
use thiserror::Error;

/// Misuse of the queue operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("the token queue is empty")]
    EmptyQueue,
    #[error("lookahead {index} is out of range ({available} tokens available)")]
    LookaheadOutOfRange { index: usize, available: usize },
    #[error(transparent)]
    Lexical(#[from] LexError),
}

pub struct Bridge<'src> {
    source: Chars<'src>,
    scanner: Scanner,
    queue: VecDeque<Token>,
    /// The scanner has seen the end of input
    exhausted: bool,
}

impl<'src> Bridge<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.chars(),
            scanner: Scanner::new(),
            queue: VecDeque::new(),
            exhausted: false,
        }
    }

    /// A bridge over an already tokenized stream
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Bridge<'static> {
        Bridge {
            source: "".chars(),
            scanner: Scanner::new(),
            queue: tokens.into_iter().collect(),
            exhausted: true,
        }
    }

    pub fn enqueue(&mut self, token: Token) {
        self.queue.push_back(token);
    }

    /// Take the front of the queue without scanning more input
    pub fn dequeue(&mut self) -> Result<Token, BridgeError> {
        self.queue.pop_front().ok_or(BridgeError::EmptyQueue)
    }

    pub fn is_not_empty(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The queued token `index` places from the front, without scanning more input
    pub fn lookahead(&self, index: usize) -> Result<&Token, BridgeError> {
        self.queue.get(index).ok_or(BridgeError::LookaheadOutOfRange {
            index,
            available: self.queue.len(),
        })
    }

    /// Scan until `wanted` tokens are queued or the input is exhausted
    fn fill(&mut self, wanted: usize) -> Result<(), LexError> {
        while self.queue.len() < wanted && !self.exhausted {
            match self.source.next() {
                Some(character) => self.scanner.scan(character)?,
                None => {
                    self.scanner.finish()?;
                    self.exhausted = true;
                }
            }
            while let Some(token) = self.scanner.next_token() {
                self.queue.push_back(token);
            }
        }
        Ok(())
    }

    /// The token `offset` places ahead, scanning as far as needed. `None` past the end.
    pub fn peek(&mut self, offset: usize) -> Result<Option<&Token>, LexError> {
        self.fill(offset + 1)?;
        Ok(self.queue.get(offset))
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.fill(1)?;
        Ok(self.queue.pop_front())
    }

    /// Reject an unsupported leading `version "x"` before any parsing happens
    pub fn check_version(&mut self) -> Result<(), PippError> {
        let declared = match self.peek(0)? {
            Some(token) if token.keyword() == Some(Keyword::Version) => token.clone(),
            _ => return Ok(()),
        };
        match self.peek(1)? {
            Some(value) if value.is_text() => {
                let value = value.clone();
                log::debug!("specification declares version {} at {}", value.value, declared.position);
                processor::check_version(&value.value, Some(value.position))
            }
            // A malformed declaration is left for the parser to report
            _ => Ok(()),
        }
    }

    pub fn parse(mut self) -> Result<Configuration, PippError> {
        self.check_version()?;
        Parser::new(&mut self).parse()
    }

    /// Parse, validate and process the whole source
    pub fn compile(
        self,
        processor: &Processor,
        warnings: &mut WarningQueue,
    ) -> Result<DocumentModel, PippError> {
        let configuration = self.parse()?;
        processor.process_ast(&configuration, warnings)
    }
}

/// The outcome of a successful run
#[derive(Debug)]
pub struct Compilation {
    pub document: DocumentModel,
    pub warnings: WarningQueue,
}

pub fn compile_str(source: &str, processor: &Processor) -> Result<Compilation, PippError> {
    let mut warnings = WarningQueue::new();
    let document = Bridge::new(source).compile(processor, &mut warnings)?;
    log::info!(
        "compiled {} sections with {} warnings",
        document.sections.len(),
        warnings.len()
    );
    Ok(Compilation { document, warnings })
}

pub fn compile_file(path: impl AsRef<Path>, processor: &Processor) -> Result<Compilation, PippError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| PippError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_str(&source, processor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::token::{Position, TokenType};

    fn text(value: &str, line: usize) -> Token {
        Token::new(TokenType::Text, value, Position::new(line, 1), 0)
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut bridge = Bridge::from_tokens(vec![text("a", 1)]);
        bridge.enqueue(text("b", 2));
        assert_eq!(bridge.len(), 2);
        assert_eq!(bridge.lookahead(1).unwrap().value, "b");
        assert_eq!(bridge.dequeue().unwrap().value, "a");
        assert_eq!(bridge.dequeue().unwrap().value, "b");
        assert!(!bridge.is_not_empty());
        assert_eq!(bridge.dequeue(), Err(BridgeError::EmptyQueue));
    }

    #[test]
    fn test_lookahead_out_of_range() {
        let bridge = Bridge::from_tokens(vec![text("a", 1)]);
        assert_eq!(
            bridge.lookahead(3),
            Err(BridgeError::LookaheadOutOfRange {
                index: 3,
                available: 1
            })
        );
    }

    #[test]
    fn test_scans_lazily() {
        let mut bridge = Bridge::new("title \"A\"\nauthor \"B\"\n");
        assert_eq!(bridge.peek(0).unwrap().map(|t| t.value.clone()), Some("title".into()));
        // Only what the peek required has been scanned
        assert!(bridge.len() < 6);
        let mut count = 0;
        while bridge.next_token().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 6);
    }

    #[test]
    fn test_unsupported_version_stops_before_parsing() {
        // The broken title would be a parse error if parsing ran
        let result = Bridge::new("version \"2.0\"\ntitle\n").parse();
        match result {
            Err(PippError::UnsupportedVersion {
                version, position, ..
            }) => {
                assert_eq!(version, "2.0");
                assert_eq!(position, Some(Position::new(1, 9)));
            }
            other => panic!("expected a version error, got {:?}", other),
        }
    }

    #[test]
    fn test_supported_version_parses() {
        let configuration = Bridge::new("version \"1.0\"\ntitle \"A\"\nauthor \"B\"\n")
            .parse()
            .unwrap();
        assert_eq!(configuration.version(), Some("1.0"));
    }

    #[test]
    fn test_compile_file_missing() {
        let processor = Processor::default();
        let result = compile_file("/nonexistent/pipp/source.pipp", &processor);
        assert!(matches!(result, Err(PippError::Io { .. })));
    }
}
