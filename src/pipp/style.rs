//! Style engine
//!
//!     Pure rule lookup and text formatting, keyed by style name:
//!
//!     - [types]: closed enumerations of the style domain (structure sections, allowances...)
//!     - [units]: lengths, colours, page spans and page formats
//!     - [text]: whitespace and punctuation normalization, paragraph assembly
//!     - [StyleGuide]: the shipped guides (MLA9 and the permissive Pipp default)
//!     - [StyleTable]: case-insensitive name registry

mod guide;
mod mla9;
mod pipp;
mod table;
pub mod text;
pub mod types;
pub mod units;

pub use guide::StyleGuide;
pub use table::StyleTable;
pub use types::{
    AllowanceType, ContentAlignment, DocumentType, InvalidValue, NumerationPosition,
    NumerationType, StructureType, WhitespaceAllowanceType,
};
pub use units::{Colour, Length, LengthUnit, PageFormat, PageRange, Percentage};
