use std::path::PathBuf;

use clap::Args;
use console::style;
use exprecon::prelude::*;
use log::info;

/// Locations of the published table and its metadata.
#[derive(Args, Debug, Clone)]
pub(crate) struct PublishedArgs {
    #[arg(long, required = true, help = "Published drug-response table (A).")]
    pub published:    PathBuf,
    #[arg(long, required = true, help = "Column metadata of the published table.")]
    pub metadata:     PathBuf,
    #[arg(
        long,
        default_value = "probe",
        help = "Name of the probe identifier column in every matrix."
    )]
    pub probe_column: String,
}

impl PublishedArgs {
    pub fn load_published(&self) -> anyhow::Result<ExpressionMatrix> {
        read_matrix("published", &self.published, &self.probe_column)
    }

    pub fn load_metadata(&self) -> anyhow::Result<ColumnMetadata> {
        read_metadata(&self.metadata)
    }
}

pub(crate) fn check_paths<'a, I: IntoIterator<Item = &'a PathBuf>>(
    paths: I
) -> anyhow::Result<()> {
    for path in paths {
        if !path.is_file() {
            anyhow::bail!("Path {} is not a file.", style(path.display()).red());
        }
        info!("Using {}", path.display());
    }
    Ok(())
}
