use std::fs::File;
use std::io::{
    BufReader,
    BufWriter,
    Write,
};
use std::path::Path;

use anyhow::Context;
use log::info;
use polars::prelude::*;

use crate::data_structs::ResultTable;

/// Writes the flat comma-separated form of `table`. `sample_id` is the
/// leading column; unresolved and ambiguous matches are empty fields.
pub fn write_result_csv<W: Write>(
    table: &ResultTable,
    sink: W,
) -> anyhow::Result<()> {
    let mut df = table.to_dataframe()?;
    CsvWriter::new(sink)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)
        .map_err(|e| anyhow::anyhow!("Failed to write result table: {}", e))
}

/// Writes the bincode snapshot of `table` to `path`.
pub fn write_snapshot<P: AsRef<Path>>(
    table: &ResultTable,
    path: P,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(
        File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?,
    );
    table
        .to_file(&mut writer)
        .with_context(|| format!("Failed to encode snapshot {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Reads a snapshot written by [`write_snapshot`].
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> anyhow::Result<ResultTable> {
    let path = path.as_ref();
    let mut reader = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );
    ResultTable::from_file(&mut reader)
        .with_context(|| format!("Failed to decode snapshot {}", path.display()))
}

/// Persists `table` as both a snapshot and a CSV file.
pub fn write_outputs<P: AsRef<Path>, Q: AsRef<Path>>(
    table: &ResultTable,
    snapshot_path: P,
    csv_path: Q,
) -> anyhow::Result<()> {
    write_snapshot(table, snapshot_path.as_ref())?;

    let csv_path = csv_path.as_ref();
    let file = File::create(csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;
    write_result_csv(table, BufWriter::new(file))?;

    info!(
        "Wrote {} rows to {} and {}",
        table.len(),
        snapshot_path.as_ref().display(),
        csv_path.display()
    );
    Ok(())
}
