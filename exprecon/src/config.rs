//! Run configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};

use crate::tools::RelabelRule;
use crate::with_field_fn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Probe used for exact-value matching against the reference panel.
    pub anchor_probe:          String,
    /// Pairs with correlation strictly above this are "highly similar".
    pub correlation_threshold: f64,
    /// Minimum value known from another dataset; columns whose minimum equals
    /// it are reported.
    pub sentinel_minimum:      Option<f64>,
    /// Offsets tried when aligning published and cohort rows. Empty means
    /// every feasible offset.
    pub candidate_offsets:     Vec<usize>,
    /// Published columns used to discover the offset. Empty means every
    /// column of `target_drug`.
    pub offset_probe_columns:  Vec<String>,
    /// A cohort column is assigned when its exact-match count is strictly
    /// above this.
    pub match_threshold:       usize,
    /// Longest reordered tail still accepted as aligned.
    pub max_reordered_tail:    usize,
    /// Drug whose columns are brute-force matched against the cohort.
    pub target_drug:           String,
    /// Drug sharing the same samples as `target_drug`; receives a copy of its
    /// matches under `relabel`.
    pub mirror_drug:           Option<String>,
    pub relabel:               RelabelRule,
}

impl ReconcileConfig {
    with_field_fn!(anchor_probe, String);
    with_field_fn!(correlation_threshold, f64);
    with_field_fn!(sentinel_minimum, Option<f64>);
    with_field_fn!(candidate_offsets, Vec<usize>);
    with_field_fn!(offset_probe_columns, Vec<String>);
    with_field_fn!(match_threshold, usize);
    with_field_fn!(max_reordered_tail, usize);
    with_field_fn!(target_drug, String);
    with_field_fn!(mirror_drug, Option<String>);
    with_field_fn!(relabel, RelabelRule);

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.anchor_probe.is_empty(), "Anchor probe is not set");
        anyhow::ensure!(!self.target_drug.is_empty(), "Target drug is not set");
        anyhow::ensure!(
            self.correlation_threshold.is_finite(),
            "Correlation threshold must be finite, got {}",
            self.correlation_threshold
        );
        if let Some(mirror) = self.mirror_drug.as_ref() {
            anyhow::ensure!(
                mirror != &self.target_drug,
                "Mirror drug must differ from target drug '{}'",
                self.target_drug
            );
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            anchor_probe:          String::new(),
            correlation_threshold: 0.99,
            sentinel_minimum:      None,
            candidate_offsets:     Vec::new(),
            offset_probe_columns:  Vec::new(),
            match_threshold:       1000,
            max_reordered_tail:    100,
            target_drug:           String::new(),
            mirror_drug:           None,
            relabel:               RelabelRule::Swap,
        }
    }
}
