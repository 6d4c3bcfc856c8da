//! Configuration tree
//!
//!     The parser builds one [Configuration] per specification. Every node owns its
//!     children and implements [ConfigNode]: an error pass that stops at the first fatal
//!     finding, a warning pass that always completes, and a debug rendering used by the
//!     `pipp ast` command.
//!
//!     Both passes visit a node's children before the node itself, so a node's own checks
//!     may assume its members are individually valid.
//!
//!     Values are kept as written ([Scalar]: text plus position). Their domain types are
//!     parsed during validation and again by the processor, which keeps the tree a faithful
//!     record of the source and lets every error point at the text that caused it.

pub mod bibliography;
pub mod body;
pub mod configuration;
pub mod person;
pub mod publication;
pub mod style;
pub mod title;
pub mod value;

pub use bibliography::{Bibliography, Source, SourceKind};
pub use body::{Body, BodyElement, ContentBlock, ContentKind, ImageNode, Run, SentenceNode};
pub use configuration::Configuration;
pub use person::{Assessor, Assessors, Author, Authors, Person};
pub use publication::Publication;
pub use style::{
    EndnotesConfig, FontConfig, LayoutConfig, NumerationConfig, ParagraphConfig, SentenceConfig,
    Style, StructureList,
};
pub use title::{Citation, CitedText, Title};
pub use value::Scalar;

use super::diagnostics::WarningQueue;
use super::error::ConfigError;

/// Validation and inspection shared by every node of the tree
pub trait ConfigNode {
    /// First fatal finding of this subtree, children first
    fn validate_errors(&self) -> Result<(), ConfigError>;

    /// Append the non-fatal findings of this subtree
    fn validate_warnings(&self, warnings: &mut WarningQueue);

    fn render_debug(&self) -> String;
}

/// `Name[child, child]`
pub(crate) fn render_children(name: &str, children: impl Iterator<Item = String>) -> String {
    let children: Vec<String> = children.collect();
    format!("{name}[{}]", children.join(", "))
}
