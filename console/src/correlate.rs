use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use exprecon::prelude::*;
use polars::prelude::*;

use crate::inputs::{
    check_paths,
    PublishedArgs,
};
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct CorrelateArgs {
    #[clap(flatten)]
    published: PublishedArgs,
    #[arg(
        long,
        default_value_t = 0.99,
        help = "Correlation above which column pairs are listed."
    )]
    threshold: f64,
    #[arg(long, help = "Write the full correlation matrix to this CSV.")]
    output:    Option<PathBuf>,
}

impl CorrelateArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        check_paths([&self.published.published, &self.published.metadata])?;
        let published = self.published.load_published()?;
        let metadata = self.published.load_metadata()?;
        metadata.validate_against(&published)?;

        let correlation = CorrelationMatrix::compute(&published);

        if let Some(path) = self.output.as_ref() {
            let mut df = correlation.to_dataframe()?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            CsvWriter::new(BufWriter::new(file))
                .include_header(true)
                .with_separator(b',')
                .finish(&mut df)?;
        }

        let drug_of = |sample: &str| {
            metadata
                .get(sample)
                .map(|r| r.drug_name.clone())
                .unwrap_or_default()
        };
        let pairs = correlation.high_similarity_pairs(self.threshold);
        for pair in pairs.iter() {
            println!(
                "{} ({}) ~ {} ({}) r = {:.4}",
                style(&pair.left).cyan(),
                drug_of(&pair.left),
                style(&pair.right).cyan(),
                drug_of(&pair.right),
                pair.correlation
            );
        }
        println!(
            "{}",
            style(format!(
                "Found {} pairs above {}.",
                pairs.len(),
                self.threshold
            ))
            .green()
            .bold()
        );
        Ok(())
    }
}
