pub use crate::config::ReconcileConfig;
pub use crate::data_structs::*;
pub use crate::error::ReconcileError;
pub use crate::io::{
    read_dataframe,
    read_matrix,
    read_metadata,
    read_snapshot,
    read_status,
    write_outputs,
    write_result_csv,
    write_snapshot,
    TableFormat,
};
pub use crate::tools::{
    align_at,
    align_slices,
    best_offset,
    collate,
    column_minimums,
    discover_offset,
    discover_run_offset,
    exact_value_match,
    mirror_matches,
    reconcile,
    BruteForceMatch,
    ColumnMinimum,
    CorrelationMatrix,
    MinimumProfile,
    ReconcileInputs,
    Reconciliation,
    RelabelRule,
    RunOffset,
    SimilarPair,
};
