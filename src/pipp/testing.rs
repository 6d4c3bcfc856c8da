//! Vetted pipp sources and assertion helpers for tests
//!
//! # Use the samples
//!
//! The pipp language is small but easy to get subtly wrong by hand: a stray space before
//! a comment, two spaces of indentation, a field that belongs to another source kind.
//! Tests that inline their own sources tend to test the typo instead of the compiler.
//! Draw input from [PippSources] instead; every sample under `samples/` is checked
//! against the current grammar whenever the test suite runs.
//!
//! ```rust,ignore
//! use pipp::pipp::testing::{PippSources, fixed_processor};
//!
//! let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor())?;
//! assert_eq!(compilation.document.style, "MLA9");
//! ```
//!
//! Available samples:
//!     - `000-minimal.pipp`: title, author and one paragraph
//!     - `010-mla9-paper.pipp`: MLA9 paper citing one source of every kind
//!     - `020-pipp-seminar.pipp`: Pipp seminar paper with a full style block
//!     - `030-mla9-book.pipp`: MLA9 book with front matter and an appendix
//!     - `040-parse-errors.pipp`: three broken sections
//!     - `050-structure-order.pipp`: endnotes in front of a required section
//!     - `060-layout.pipp`: header block, images and a blank page in the body
//!
//! Unit tests of a single parser rule or formatting helper may still build tiny inputs
//! inline; anything that compiles a whole document should use a sample.

use super::ast::Configuration;
use super::bridge::{compile_str, Bridge, Compilation};
use super::diagnostics::WarningQueue;
use super::document::{Block, DocumentModel, Section, SectionKind};
use super::error::PippError;
use super::processor::Processor;
use super::scanner::{tokenize, LexError};
use super::token::Token;
use chrono::NaiveDate;
use thiserror::Error;

const AVAILABLE_SAMPLES: &[(&str, &str)] = &[
    ("000-minimal.pipp", include_str!("../../samples/000-minimal.pipp")),
    ("010-mla9-paper.pipp", include_str!("../../samples/010-mla9-paper.pipp")),
    ("020-pipp-seminar.pipp", include_str!("../../samples/020-pipp-seminar.pipp")),
    ("030-mla9-book.pipp", include_str!("../../samples/030-mla9-book.pipp")),
    ("040-parse-errors.pipp", include_str!("../../samples/040-parse-errors.pipp")),
    ("050-structure-order.pipp", include_str!("../../samples/050-structure-order.pipp")),
    ("060-layout.pipp", include_str!("../../samples/060-layout.pipp")),
];

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample '{name}' not found. Available samples: {available}")]
    NotFound { name: String, available: String },

    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    Compile(#[from] PippError),
}

/// Access to the vetted sample documents
pub struct PippSources;

impl PippSources {
    pub fn list_samples() -> Vec<&'static str> {
        AVAILABLE_SAMPLES.iter().map(|(name, _)| *name).collect()
    }

    fn validate_sample(name: &str) -> Result<&'static str, SampleError> {
        AVAILABLE_SAMPLES
            .iter()
            .find(|(sample, _)| *sample == name)
            .map(|(_, source)| *source)
            .ok_or_else(|| SampleError::NotFound {
                name: name.to_string(),
                available: Self::list_samples().join(", "),
            })
    }

    pub fn get_string(name: &str) -> Result<&'static str, SampleError> {
        Self::validate_sample(name)
    }

    pub fn get_tokens(name: &str) -> Result<Vec<Token>, SampleError> {
        Ok(tokenize(Self::get_string(name)?)?)
    }

    pub fn get_configuration(name: &str) -> Result<Configuration, SampleError> {
        Ok(Bridge::new(Self::get_string(name)?).parse()?)
    }

    pub fn compile(name: &str, processor: &Processor) -> Result<Compilation, SampleError> {
        Ok(compile_str(Self::get_string(name)?, processor)?)
    }
}

/// A processor whose fallback date is pinned to 3 June 2023
pub fn fixed_processor() -> Processor {
    let processor = Processor::default();
    match NaiveDate::from_ymd_opt(2023, 6, 3) {
        Some(date) => processor.with_date(date),
        None => processor,
    }
}

#[track_caller]
pub fn assert_outline(document: &DocumentModel, expected: &[SectionKind]) {
    assert_eq!(
        document.outline(),
        expected,
        "outline mismatch for a {} document in style {}",
        document.document_type,
        document.style
    );
}

/// Plain text of every paragraph in a section, in order
pub fn paragraph_texts(section: &Section) -> Vec<String> {
    section
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph.text()),
            _ => None,
        })
        .collect()
}

/// Every single-line block of a section (title page lines, contents entries)
pub fn line_texts(section: &Section) -> Vec<String> {
    section
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Line { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Plain text of every bibliography entry, in printed order
pub fn entry_texts(document: &DocumentModel) -> Vec<String> {
    document
        .sections
        .iter()
        .flat_map(|section| section.blocks.iter())
        .filter_map(|block| match block {
            Block::Entry(entry) => Some(entry.text()),
            _ => None,
        })
        .collect()
}

pub fn warning_messages(warnings: &WarningQueue) -> Vec<String> {
    warnings.iter().map(|warning| warning.message.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_scans() {
        for name in PippSources::list_samples() {
            let tokens = PippSources::get_tokens(name)
                .unwrap_or_else(|error| panic!("{name} failed to scan: {error}"));
            assert!(!tokens.is_empty(), "{name} produced no tokens");
        }
    }

    #[test]
    fn test_unknown_sample() {
        let error = PippSources::get_string("999-missing.pipp").unwrap_err();
        assert!(error.to_string().starts_with("sample '999-missing.pipp' not found"));
        assert!(error.to_string().contains("000-minimal.pipp"));
    }

    #[test]
    fn test_minimal_sample_compiles() {
        let compilation = PippSources::compile("000-minimal.pipp", &fixed_processor()).unwrap();
        let body = compilation.document.body().expect("a body section");
        assert_eq!(paragraph_texts(body), vec!["Ravens are clever."]);
    }
}
