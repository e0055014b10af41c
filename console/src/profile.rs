use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use exprecon::prelude::*;
use itertools::Itertools;
use polars::prelude::*;

use crate::inputs::{
    check_paths,
    PublishedArgs,
};
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct ProfileArgs {
    #[clap(flatten)]
    published: PublishedArgs,
    #[arg(long, help = "Known minimum value to look for.")]
    sentinel:  Option<f64>,
    #[arg(long, help = "Write per-column minimums to this CSV.")]
    output:    Option<PathBuf>,
}

impl ProfileArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        check_paths([&self.published.published, &self.published.metadata])?;
        let published = self.published.load_published()?;
        let metadata = self.published.load_metadata()?;
        let profile = MinimumProfile::compute(&published, &metadata)?;

        if let Some(path) = self.output.as_ref() {
            let records = profile.records();
            let mut df = DataFrame::new(vec![
                Column::new(
                    "sample_id".into(),
                    records.iter().map(|r| r.sample_id.as_str()).collect_vec(),
                ),
                Column::new(
                    "drug_name".into(),
                    records.iter().map(|r| r.drug_name.as_str()).collect_vec(),
                ),
                Column::new("minimum".into(), profile.minimums()),
            ])?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            CsvWriter::new(BufWriter::new(file))
                .include_header(true)
                .with_separator(b',')
                .finish(&mut df)?;
        }

        for (drug, minimums) in profile.group_minimums() {
            let lowest = minimums.iter().copied().fold(f64::INFINITY, f64::min);
            println!(
                "{} {} columns, lowest minimum {}",
                style(format!("{}:", drug)).blue(),
                minimums.len(),
                style(lowest).green()
            );
        }
        if let Some(global) = profile.global_minimum() {
            let at_global = profile
                .at_global_minimum()
                .into_iter()
                .map(|r| r.sample_id.as_str())
                .join(", ");
            println!("{} {} ({})", style("Global minimum:").bold(), global, at_global);
        }
        if let Some(sentinel) = self.sentinel {
            let hits = profile.sentinel_hits(sentinel);
            println!(
                "{}",
                style(format!("{} columns have minimum {}.", hits.len(), sentinel))
                    .green()
                    .bold()
            );
            for hit in hits {
                println!("  {} ({})", hit.sample_id, hit.drug_name);
            }
        }
        Ok(())
    }
}
