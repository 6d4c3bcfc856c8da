//! Main module for the pipp compiler
//!
//!     The pipeline runs leaf-first through these modules:
//!
//!         source characters -> scanner -> tokens -> bridge -> parsing -> ast
//!             -> validation -> processor (style, formatting, bibliography) -> document
//!
//!     The [bridge] owns the whole run; [bridge::compile_file] and [bridge::compile_str]
//!     are the usual entry points.

pub mod ast;
pub mod bibliography;
pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod parsing;
pub mod processor;
pub mod scanner;
pub mod style;
pub mod testing;
pub mod token;
