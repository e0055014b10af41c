//! Fatal precondition failures.
//!
//! Ambiguous or missing matches are never errors; they are carried as
//! [`MatchOutcome`](crate::data_structs::MatchOutcome) values. The variants
//! below are raised when the inputs themselves cannot be compared. They are
//! returned wrapped in [`anyhow::Error`], so callers can recover the kind with
//! `err.downcast_ref::<ReconcileError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("anchor probe '{probe}' is not present in matrix '{matrix}'")]
    MissingAnchor { probe: String, matrix: String },

    #[error(
        "offset {offset} with {len} source rows exceeds target matrix of {rows} rows"
    )]
    OffsetOutOfBounds {
        offset: usize,
        len:    usize,
        rows:   usize,
    },

    #[error(
        "metadata does not agree with matrix columns (missing in matrix: \
         {missing_in_matrix:?}, missing in metadata: {missing_in_metadata:?})"
    )]
    MetadataMismatch {
        missing_in_matrix:   Vec<String>,
        missing_in_metadata: Vec<String>,
    },

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("sample '{sample}' is not a column of matrix '{matrix}'")]
    UnknownSample { sample: String, matrix: String },

    #[error("duplicate {axis} identifier '{id}'")]
    DuplicateIdentifier { id: String, axis: &'static str },
}
