//! Loading inputs from disk and persisting the result table.
//!
//! Tables are read with polars, either as Arrow IPC (`.ipc`, `.arrow`,
//! `.feather`) or as delimited text (`.csv`, `.tsv`, `.txt`). The result table
//! is written twice: a bincode snapshot keeping the tagged match outcomes and
//! a comma-separated flat file where unresolved matches are empty fields.

mod read;
mod write;

pub use read::{
    read_dataframe,
    read_matrix,
    read_metadata,
    read_status,
    TableFormat,
};
pub use write::{
    read_snapshot,
    write_outputs,
    write_result_csv,
    write_snapshot,
};
