use super::{ParseError, ParseErrors};
use crate::pipp::ast::{Configuration, Scalar};
use crate::pipp::bridge::Bridge;
use crate::pipp::error::PippError;
use crate::pipp::scanner::LexError;
use crate::pipp::token::{Keyword, Position, Token};
use std::collections::HashSet;

/// Why a production stopped
#[derive(Debug)]
pub(super) enum ParseFailure {
    /// Recoverable: recorded, then the parser resynchronizes
    Syntax(ParseError),
    /// Fatal for the whole pass
    Lexical(LexError),
}

impl From<ParseError> for ParseFailure {
    fn from(error: ParseError) -> Self {
        ParseFailure::Syntax(error)
    }
}

impl From<LexError> for ParseFailure {
    fn from(error: LexError) -> Self {
        ParseFailure::Lexical(error)
    }
}

pub(super) type Step<T> = Result<T, ParseFailure>;

pub struct Parser<'a, 'src> {
    bridge: &'a mut Bridge<'src>,
    errors: Vec<ParseError>,
    /// The last consumed token ended a line (or nothing was consumed yet)
    at_line_start: bool,
    last_position: Position,
    /// Sections that may appear once and already did
    pub(super) seen: HashSet<Keyword>,
    /// Sections parsed so far
    pub(super) sections: usize,
}

impl<'a, 'src> Parser<'a, 'src> {
    pub fn new(bridge: &'a mut Bridge<'src>) -> Self {
        Self {
            bridge,
            errors: Vec::new(),
            at_line_start: true,
            last_position: Position::new(1, 1),
            seen: HashSet::new(),
            sections: 0,
        }
    }

    /// Parse every section, collecting errors across sections
    pub fn parse(mut self) -> Result<Configuration, PippError> {
        let mut configuration = Configuration::default();
        loop {
            let start = match self.peek(0) {
                Ok(Some(token)) => token.position,
                Ok(None) => break,
                Err(failure) => return Err(self.fatal(failure)),
            };
            match self.section(&mut configuration) {
                Ok(()) => self.sections += 1,
                Err(ParseFailure::Syntax(error)) => {
                    log::debug!("{error}; resynchronizing");
                    self.errors.push(error);
                    if let Err(failure) = self.synchronize(start) {
                        return Err(self.fatal(failure));
                    }
                }
                Err(ParseFailure::Lexical(error)) => return Err(error.into()),
            }
        }

        if self.errors.is_empty() {
            log::debug!("parsed {} sections", self.sections);
            Ok(configuration)
        } else {
            Err(PippError::Parse(ParseErrors::new(self.errors)))
        }
    }

    fn fatal(&mut self, failure: ParseFailure) -> PippError {
        match failure {
            ParseFailure::Lexical(error) => error.into(),
            ParseFailure::Syntax(error) => {
                self.errors.push(error);
                PippError::Parse(ParseErrors::new(std::mem::take(&mut self.errors)))
            }
        }
    }

    /// Skip to the next line that starts with a keyword at depth 0, never stopping on the
    /// token the failed section started with.
    fn synchronize(&mut self, start: Position) -> Step<()> {
        while let Some(token) = self.peek(0)? {
            if self.at_line_start
                && token.is_keyword()
                && token.indent == 0
                && token.position != start
            {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    pub(super) fn peek(&mut self, offset: usize) -> Step<Option<Token>> {
        Ok(self.bridge.peek(offset)?.cloned())
    }

    pub(super) fn advance(&mut self) -> Step<Option<Token>> {
        let token = self.bridge.next_token()?;
        if let Some(token) = &token {
            self.at_line_start = token.is_new_line();
            self.last_position = token.position;
        }
        Ok(token)
    }

    /// An error describing the next token as not being what was expected
    pub(super) fn unexpected(&mut self, expected: &str) -> ParseFailure {
        match self.peek(0) {
            Ok(Some(token)) => ParseError::unexpected(expected, &token).into(),
            Ok(None) => ParseError::end_of_input(expected, self.last_position).into(),
            Err(failure) => failure,
        }
    }

    pub(super) fn scalar(&mut self, expected: &str) -> Step<Scalar> {
        match self.peek(0)? {
            Some(token) if token.is_text() => {
                self.advance()?;
                Ok(Scalar::new(token.value, token.position))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// `TEXT (, TEXT)*`
    pub(super) fn scalar_list(&mut self, expected: &str) -> Step<Vec<Scalar>> {
        let mut items = vec![self.scalar(expected)?];
        while self.peek(0)?.is_some_and(|token| token.is_separator()) {
            self.advance()?;
            items.push(self.scalar(expected)?);
        }
        Ok(items)
    }

    pub(super) fn end_of_line(&mut self) -> Step<()> {
        match self.peek(0)? {
            None => Ok(()),
            Some(token) if token.is_new_line() => {
                self.advance()?;
                Ok(())
            }
            _ => Err(self.unexpected("the end of the line")),
        }
    }

    pub(super) fn scalar_line(&mut self, expected: &str) -> Step<Scalar> {
        let scalar = self.scalar(expected)?;
        self.end_of_line()?;
        Ok(scalar)
    }

    /// A line break followed by indentation: the keyword just consumed opens a block
    pub(super) fn opens_block(&mut self) -> Step<bool> {
        let line_break = self.peek(0)?.is_some_and(|token| token.is_new_line());
        Ok(line_break && self.peek(1)?.is_some_and(|token| token.is_indent()))
    }

    /// Consume the line break and indentation after `opener`; returns the member depth
    fn open_block(&mut self, opener: &Token) -> Step<usize> {
        let depth = opener.indent + 1;
        let expected = format!("an indented block after `{}`", opener.value);
        match self.peek(0)? {
            Some(token) if token.is_new_line() => {
                self.advance()?;
            }
            _ => return Err(self.unexpected(&expected)),
        }
        match self.peek(0)? {
            Some(token) if token.is_indent() && token.value == depth.to_string() => {
                self.advance()?;
                Ok(depth)
            }
            _ => Err(self.unexpected(&expected)),
        }
    }

    /// The first token of the next member line, or `None` once the block has closed
    fn next_member(&mut self, depth: usize) -> Step<Option<Token>> {
        match self.peek(0)? {
            Some(token) if token.is_indent() => {
                Err(self.unexpected(&format!("a line at indentation depth {depth}")))
            }
            Some(token) if token.indent >= depth => Ok(Some(token)),
            _ => Ok(None),
        }
    }

    /// Parse the block opened by `opener`, one member line at a time. `member` receives the
    /// first token of the line unconsumed and must consume the whole line.
    pub(super) fn block<F>(&mut self, opener: &Token, mut member: F) -> Step<()>
    where
        F: FnMut(&mut Self, Token) -> Step<()>,
    {
        let depth = self.open_block(opener)?;
        while let Some(token) = self.next_member(depth)? {
            member(self, token)?;
        }
        Ok(())
    }

    /// Consume `member` as a keyword the caller accepts
    pub(super) fn member_keyword(
        &mut self,
        member: &Token,
        expected: &str,
        mut accepts: impl FnMut(Keyword) -> bool,
    ) -> Step<Keyword> {
        match member.keyword().filter(|keyword| accepts(*keyword)) {
            Some(keyword) => {
                self.advance()?;
                Ok(keyword)
            }
            None => Err(ParseError::unexpected(expected, member).into()),
        }
    }

    /// A block of `keyword "value"` lines filling the slots `slot` hands out
    pub(super) fn field_block<T>(
        &mut self,
        opener: &Token,
        target: &mut T,
        expected: &str,
        slot: fn(&mut T, Keyword) -> Option<&mut Option<Scalar>>,
    ) -> Step<()> {
        self.block(opener, |parser, member| {
            let keyword =
                parser.member_keyword(&member, expected, |keyword| slot(target, keyword).is_some())?;
            let value = parser.scalar_line(&format!("a text after `{keyword}`"))?;
            match slot(target, keyword) {
                Some(field) => assign(field, value, &member),
                None => Ok(()),
            }
        })
    }
}

/// Fill a field that may be declared once
pub(super) fn assign(slot: &mut Option<Scalar>, value: Scalar, keyword: &Token) -> Step<()> {
    if slot.is_some() {
        return Err(ParseError::new(
            format!("`{}` is declared more than once", keyword.value),
            keyword,
        )
        .into());
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::ast::ConfigNode;

    fn parse(source: &str) -> Result<Configuration, PippError> {
        let mut bridge = Bridge::new(source);
        Parser::new(&mut bridge).parse()
    }

    fn errors(source: &str) -> Vec<ParseError> {
        match parse(source) {
            Err(PippError::Parse(errors)) => errors.into_vec(),
            other => panic!("expected parse errors, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_document() {
        let configuration = parse("title \"On Ravens\"\nauthor \"Jane Doe\"\n").unwrap();
        assert_eq!(configuration.title.text(), "On Ravens");
        assert_eq!(configuration.authors.members.len(), 1);
        assert!(configuration.validate_errors().is_ok());
    }

    #[test]
    fn test_errors_collected_across_sections() {
        let source = "title\nauthor \"Jane Doe\" \"extra\"\ntype \"Paper\"\nstyle \"MLA9\" \"x\"\n";
        let found = errors(source);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].position, Position::new(1, 6));
        assert_eq!(found[0].found.as_deref(), Some("end of line"));
        assert_eq!(found[1].position, Position::new(2, 19));
        assert_eq!(found[2].position, Position::new(4, 14));
    }

    #[test]
    fn test_unknown_section_keyword() {
        let found = errors("titel \"x\"\nauthor \"A\"\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("unknown keyword `titel`"));
    }

    #[test]
    fn test_lexical_error_aborts() {
        let result = parse("title \"ok\"\nauthor \"A\" %\n");
        assert!(matches!(result, Err(PippError::Lexical(_))));
    }

    #[test]
    fn test_block_closes_at_end_of_input() {
        let configuration = parse("author\n    firstname \"Jane\"\n    lastname \"Doe\"").unwrap();
        let author = &configuration.authors.members[0];
        assert_eq!(author.full_name(), "Jane Doe");
    }

    #[test]
    fn test_unexpected_indentation() {
        let found = errors("author\n    name \"A\"\n        role \"B\"\ntitle \"T\"\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Position::new(3, 1));
    }

    #[test]
    fn test_duplicate_field() {
        let found = errors("author\n    name \"A\"\n    name \"B\"\n");
        assert_eq!(found[0].message, "`name` is declared more than once");
    }
}
