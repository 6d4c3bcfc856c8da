//! # pipp
//!
//! A compiler for the Pipp document specification language: an indentation-based
//! plain-text format describing a document's title, authorship, publication data,
//! style directives, body text and bibliography. Compilation produces a formatted,
//! style-guide-conformant document model that a renderer turns into pages.
//!
//! ## Testing
//!
//! Tests should draw their input from the vetted samples exposed by the
//! [testing module](pipp::testing).

pub mod pipp;
