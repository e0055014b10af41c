//! # exprecon
//!
//! `exprecon` reconciles three gene-expression tables to find out where the
//! columns of a published table really come from:
//!
//! * **A**, the published drug-response table, described column by column by
//!   a metadata table (drug name, contrast arm);
//! * **B**, a reference cell-line panel;
//! * **C**, a patient-cohort dataset with an external per-sample status.
//!
//! The procedure is a fixed chain of exact-value matching, correlation and
//! minimum profiling, row-offset discovery and brute-force column matching,
//! followed by collation into one annotated [`ResultTable`] row per column of
//! A. Ambiguity is data, not failure: every match is a tagged
//! [`MatchOutcome`]. Only malformed inputs (missing anchor probe, an offset
//! that does not fit, metadata disagreeing with the matrix) are fatal; see
//! [`ReconcileError`].
//!
//! ## Structure
//!
//! * [`data_structs`]: matrices, metadata, match outcomes and the result
//!   table.
//! * [`tools`]: the analysis steps and the [`reconcile`](tools::reconcile)
//!   pipeline.
//! * [`io`]: polars-based loading of IPC/CSV tables and writing of the bincode
//!   snapshot and CSV export.
//! * [`config`]: [`ReconcileConfig`], loadable from JSON.
//!
//! ## Usage
//!
//! ```no_run
//! use exprecon::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let inputs = ReconcileInputs {
//!         published: read_matrix("published", "published.ipc", "probe")?,
//!         reference: read_matrix("nci60", "nci60.ipc", "probe")?,
//!         cohort:    read_matrix("geo", "geo.ipc", "probe")?,
//!         metadata:  read_metadata("metadata.csv")?,
//!         status:    read_status("status.csv")?,
//!     };
//!     let config = ReconcileConfig::default()
//!         .with_anchor_probe("1007_s_at".into())
//!         .with_target_drug("erlotinib".into())
//!         .with_mirror_drug(Some("sorafenib".into()));
//!
//!     let result = reconcile(&inputs, &config)?;
//!     write_outputs(&result.table, "result.bin", "result.csv")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use crate::config::ReconcileConfig;
pub use crate::data_structs::{
    ColumnMetadata,
    ContrastGroup,
    ExpressionMatrix,
    MatchMap,
    MatchOutcome,
    OffsetMatch,
    ResultRow,
    ResultTable,
    SampleRecord,
    StatusTable,
};
pub use crate::error::ReconcileError;
