//! Helpers shared across the crate: Pearson correlation, polars column
//! extraction and the builder-style field macros used by configuration
//! structs.

use anyhow::Context;
use polars::prelude::*;

mod stats;
pub use stats::*;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}

/// Reads a column as owned strings, casting numeric identifiers if needed.
///
/// Nulls are rejected: identifiers must be present for every row.
pub(crate) fn string_column(
    df: &DataFrame,
    name: &str,
) -> anyhow::Result<Vec<String>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::String)?;
    let ca = column.str()?;
    anyhow::ensure!(
        ca.null_count() == 0,
        "Column '{}' contains {} null values",
        name,
        ca.null_count()
    );
    Ok(ca
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Reads a column as `f64` values. Nulls are rejected.
pub(crate) fn float_column(
    df: &DataFrame,
    name: &str,
) -> anyhow::Result<Vec<f64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)?;
    let ca = column.f64()?;
    anyhow::ensure!(
        ca.null_count() == 0,
        "Column '{}' contains {} null values",
        name,
        ca.null_count()
    );
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Reads a column as `i64` values. Nulls are rejected.
pub(crate) fn int_column(
    df: &DataFrame,
    name: &str,
) -> anyhow::Result<Vec<i64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Int64)?;
    let ca = column.i64()?;
    anyhow::ensure!(
        ca.null_count() == 0,
        "Column '{}' contains {} null values",
        name,
        ca.null_count()
    );
    Ok(ca.into_iter().map(|v| v.unwrap_or_default()).collect())
}
