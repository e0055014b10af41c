use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;
use log::{
    debug,
    info,
};
use polars::prelude::*;

use crate::data_structs::{
    ColumnMetadata,
    ExpressionMatrix,
    StatusTable,
};

/// On-disk layout of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Ipc,
    Csv,
    Tsv,
}

impl TableFormat {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .with_context(|| format!("No file extension in {}", path.display()))?;
        match extension.as_str() {
            "ipc" | "arrow" | "feather" => Ok(TableFormat::Ipc),
            "csv" => Ok(TableFormat::Csv),
            "tsv" | "txt" => Ok(TableFormat::Tsv),
            other => anyhow::bail!("Unsupported table format '{}'", other),
        }
    }

    fn read_options(&self) -> CsvReadOptions {
        let separator = match self {
            TableFormat::Tsv => b'\t',
            _ => b',',
        };
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(separator)
                    .with_try_parse_dates(false),
            )
    }
}

/// Reads a whole table into memory.
pub fn read_dataframe<P: AsRef<Path>>(path: P) -> anyhow::Result<DataFrame> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    debug!("Reading {} as {:?}", path.display(), format);

    let df = match format {
        TableFormat::Ipc => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            IpcReader::new(file).finish()
        },
        TableFormat::Csv | TableFormat::Tsv => {
            format
                .read_options()
                .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
                .finish()
        },
    }
    .with_context(|| format!("Failed to read {}", path.display()))?;

    info!("Read {} ({} rows x {} columns)", path.display(), df.height(), df.width());
    Ok(df)
}

/// Reads an expression matrix; `probe_column` holds the row identifiers.
pub fn read_matrix<P: AsRef<Path>>(
    name: &str,
    path: P,
    probe_column: &str,
) -> anyhow::Result<ExpressionMatrix> {
    let df = read_dataframe(path.as_ref())?;
    ExpressionMatrix::try_from_dataframe(name, &df, probe_column)
        .with_context(|| format!("Invalid matrix in {}", path.as_ref().display()))
}

/// Reads column metadata (`sample_id`, `drug_name`, `contrast_group`).
pub fn read_metadata<P: AsRef<Path>>(path: P) -> anyhow::Result<ColumnMetadata> {
    let df = read_dataframe(path.as_ref())?;
    ColumnMetadata::try_from_dataframe(&df)
        .with_context(|| format!("Invalid metadata in {}", path.as_ref().display()))
}

/// Reads cohort sample statuses (`sample_id`, `status`).
pub fn read_status<P: AsRef<Path>>(path: P) -> anyhow::Result<StatusTable> {
    let df = read_dataframe(path.as_ref())?;
    StatusTable::try_from_dataframe(&df)
        .with_context(|| format!("Invalid status table in {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a.ipc", TableFormat::Ipc)]
    #[case("a.feather", TableFormat::Ipc)]
    #[case("dir/b.CSV", TableFormat::Csv)]
    #[case("c.tsv", TableFormat::Tsv)]
    fn test_format_from_path(
        #[case] path: &str,
        #[case] expected: TableFormat,
    ) {
        assert_eq!(TableFormat::from_path(path).unwrap(), expected);
    }

    #[test]
    fn test_unsupported_format() {
        assert!(TableFormat::from_path("a.xlsx").is_err());
        assert!(TableFormat::from_path("noext").is_err());
    }

    #[test]
    fn test_read_csv_matrix() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "probe,s1,s2")?;
        writeln!(file, "1007_s_at,1.5,2")?;
        writeln!(file, "1053_at,3.25,4")?;
        file.flush()?;

        let matrix = read_matrix("A", file.path(), "probe")?;
        assert_eq!(matrix.probes(), &["1007_s_at".to_string(), "1053_at".to_string()]);
        assert_eq!(matrix.column_by_name("s1")?, &[1.5, 3.25]);
        assert_eq!(matrix.column_by_name("s2")?, &[2.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_read_ipc_matrix() -> anyhow::Result<()> {
        let file = tempfile::Builder::new().suffix(".ipc").tempfile()?;
        let mut df = DataFrame::new(vec![
            Column::new("probe".into(), ["p1", "p2", "p3"]),
            Column::new("GSM1".into(), [0.5, 1.5, 2.5]),
        ])?;
        IpcWriter::new(file.reopen()?).finish(&mut df)?;

        let matrix = read_matrix("C", file.path(), "probe")?;
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.samples(), &["GSM1".to_string()]);
        Ok(())
    }

    #[test]
    fn test_read_metadata_and_status() -> anyhow::Result<()> {
        let mut meta = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(meta, "sample_id,drug_name,contrast_group")?;
        writeln!(meta, "s1,erlotinib,0")?;
        writeln!(meta, "s2,erlotinib,1")?;
        meta.flush()?;
        let metadata = read_metadata(meta.path())?;
        assert_eq!(metadata.len(), 2);

        let mut status = tempfile::Builder::new().suffix(".tsv").tempfile()?;
        writeln!(status, "sample_id\tstatus")?;
        writeln!(status, "GSM1\tresponder")?;
        status.flush()?;
        let status = read_status(status.path())?;
        assert_eq!(status.get("GSM1"), Some("responder"));
        Ok(())
    }

    #[test]
    fn test_rejects_null_values() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "probe,s1")?;
        writeln!(file, "p1,1.0")?;
        writeln!(file, "p2,")?;
        file.flush()?;
        assert!(read_matrix("A", file.path(), "probe").is_err());
        Ok(())
    }
}
