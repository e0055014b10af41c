use std::path::PathBuf;

use clap::Args;
use console::style;
use exprecon::prelude::*;
use log::info;

use crate::inputs::{
    check_paths,
    PublishedArgs,
};
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    #[clap(flatten)]
    published: PublishedArgs,
    #[arg(long, required = true, help = "NCI60 reference panel (B).")]
    reference: PathBuf,
    #[arg(long, required = true, help = "GEO cohort table (C).")]
    cohort:    PathBuf,
    #[arg(long, required = true, help = "Cohort sample statuses.")]
    status:    PathBuf,

    #[arg(long, help = "JSON run configuration. Flags below override it.")]
    config:                Option<PathBuf>,
    #[arg(long, help = "Probe used for exact-value matching.")]
    anchor_probe:          Option<String>,
    #[arg(long, help = "Drug whose columns are matched against the cohort.")]
    target_drug:           Option<String>,
    #[arg(long, help = "Drug receiving a relabelled copy of the target matches.")]
    mirror_drug:           Option<String>,
    #[arg(long, help = "Copy matches arm-to-arm instead of swapping arms.")]
    identity_relabel:      bool,
    #[arg(long, help = "Exact-match count a cohort column must exceed.")]
    match_threshold:       Option<usize>,
    #[arg(long, help = "Correlation above which columns are reported as similar.")]
    correlation_threshold: Option<f64>,
    #[arg(long, help = "Known minimum value to look for in the published table.")]
    sentinel_minimum:      Option<f64>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Row offsets to try. Every feasible offset when omitted."
    )]
    offsets:               Vec<usize>,

    #[arg(long, required = true, help = "Output snapshot path.")]
    snapshot: PathBuf,
    #[arg(long, required = true, help = "Output CSV path.")]
    output:   PathBuf,
}

impl RunArgs {
    fn config(&self) -> anyhow::Result<ReconcileConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => ReconcileConfig::from_json_file(path)?,
            None => ReconcileConfig::default(),
        };
        if let Some(anchor) = self.anchor_probe.clone() {
            config = config.with_anchor_probe(anchor);
        }
        if let Some(target) = self.target_drug.clone() {
            config = config.with_target_drug(target);
        }
        if self.mirror_drug.is_some() {
            config = config.with_mirror_drug(self.mirror_drug.clone());
        }
        if self.identity_relabel {
            config = config.with_relabel(RelabelRule::Identity);
        }
        if let Some(threshold) = self.match_threshold {
            config = config.with_match_threshold(threshold);
        }
        if let Some(threshold) = self.correlation_threshold {
            config = config.with_correlation_threshold(threshold);
        }
        if self.sentinel_minimum.is_some() {
            config = config.with_sentinel_minimum(self.sentinel_minimum);
        }
        if !self.offsets.is_empty() {
            config = config.with_candidate_offsets(self.offsets.clone());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        check_paths([
            &self.published.published,
            &self.published.metadata,
            &self.reference,
            &self.cohort,
            &self.status,
        ])?;
        for output in [&self.snapshot, &self.output] {
            if output.is_dir() {
                anyhow::bail!("Output path {} is a directory.", style(output.display()).red());
            }
        }
        let config = self.config()?;
        info!("Configuration: {}", serde_json::to_string(&config)?);

        let pbar = utils.pbar(6)?;
        pbar.set_message("Reading published table");
        let published = self.published.load_published()?;
        let metadata = self.published.load_metadata()?;
        pbar.inc(1);
        pbar.set_message("Reading reference panel");
        let reference = read_matrix("reference", &self.reference, &self.published.probe_column)?;
        pbar.inc(1);
        pbar.set_message("Reading cohort");
        let cohort = read_matrix("cohort", &self.cohort, &self.published.probe_column)?;
        let status = read_status(&self.status)?;
        pbar.inc(1);

        pbar.set_message("Reconciling");
        let inputs = ReconcileInputs {
            published,
            reference,
            cohort,
            metadata,
            status,
        };
        let result = reconcile(&inputs, &config)?;
        pbar.inc(1);

        pbar.set_message("Writing");
        write_outputs(&result.table, &self.snapshot, &self.output)?;
        pbar.inc(2);
        pbar.finish_and_clear();

        report(&result);
        Ok(())
    }
}

fn report(result: &Reconciliation) {
    let nci60 = result.nci60_matches.summary();
    let geo = result.geo_matches.summary();
    println!(
        "{} row offset {}",
        style("Cohort alignment:").bold(),
        style(&result.offset).green()
    );
    println!(
        "{} {} matched, {} unresolved, {} ambiguous",
        style("NCI60:").bold(),
        style(nci60.matched).green(),
        nci60.unresolved,
        style(nci60.ambiguous).yellow()
    );
    println!(
        "{} {} matched, {} unresolved, {} ambiguous",
        style("GEO:").bold(),
        style(geo.matched).green(),
        geo.unresolved,
        style(geo.ambiguous).yellow()
    );
    for (sample, outcome) in result
        .nci60_matches
        .iter()
        .chain(result.geo_matches.iter())
        .filter(|(_, outcome)| outcome.is_ambiguous())
    {
        println!("  {} {}", style(sample).yellow(), outcome);
    }
    for pair in result.high_similarity.iter() {
        println!(
            "{} {} ~ {} (r = {:.4})",
            style("Similar:").bold(),
            pair.left,
            pair.right,
            pair.correlation
        );
    }
    if !result.sentinel_hits.is_empty() {
        println!(
            "{} {}",
            style("At sentinel minimum:").bold(),
            result.sentinel_hits.join(", ")
        );
    }
    println!(
        "{}",
        style(format!("Wrote {} rows.", result.table.len())).green().bold()
    );
}
