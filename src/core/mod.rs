//! Expansion engine

pub mod columns;
pub mod dates;
pub mod expander;

pub use columns::ColumnRange;
pub use dates::OnParseError;
pub use expander::{expand, ExpansionParams, ReferenceBuilder};
