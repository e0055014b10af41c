//! Core data structures of the reconciliation procedure.
//!
//! - [`ExpressionMatrix`]: labelled probes × samples matrix of expression
//!   values, one instance per input table (published, reference panel,
//!   cohort).
//! - [`ColumnMetadata`] and [`SampleRecord`]: drug and contrast arm of every
//!   published column. [`StatusTable`] holds the external status of cohort
//!   samples.
//! - [`MatchOutcome`] and [`MatchMap`]: tagged results of the matchers, keeping
//!   "no candidate" apart from "several candidates".
//! - [`OffsetMatch`]: positional and tail-multiset alignment under a row
//!   offset.
//! - [`ResultTable`]: the collated output, one [`ResultRow`] per published
//!   column.

mod matrix;
mod metadata;
mod offset_match;
mod outcome;
mod result_table;

#[cfg(test)]
mod tests;

pub use matrix::ExpressionMatrix;
pub use metadata::{
    ColumnMetadata,
    ContrastGroup,
    SampleRecord,
    StatusTable,
};
pub use offset_match::OffsetMatch;
pub use outcome::{
    MatchMap,
    MatchOutcome,
    MatchSummary,
};
pub use result_table::{
    ResultRow,
    ResultTable,
};
