//! The reconciliation procedure, one module per step.
//!
//! Data flows strictly downstream: [`exact`], [`correlation`] and [`minimum`]
//! work on the published table alone (plus the reference panel for
//! [`exact`]); [`offset`] discovers the row shift between published and
//! cohort rows; [`brute_force`] uses it to pair columns; [`collate`] merges
//! everything into a [`ResultTable`](crate::data_structs::ResultTable).
//! [`pipeline`] chains the steps.

pub mod brute_force;
pub mod collate;
pub mod correlation;
pub mod exact;
pub mod minimum;
pub mod offset;
pub mod pipeline;

pub use brute_force::BruteForceMatch;
pub use collate::{
    collate,
    mirror_matches,
    RelabelRule,
};
pub use correlation::{
    CorrelationMatrix,
    SimilarPair,
};
pub use exact::exact_value_match;
pub use minimum::{
    column_minimums,
    ColumnMinimum,
    MinimumProfile,
};
pub use offset::{
    align_at,
    align_slices,
    best_offset,
    discover_offset,
};
pub use pipeline::{
    discover_run_offset,
    reconcile,
    ReconcileInputs,
    Reconciliation,
    RunOffset,
};
