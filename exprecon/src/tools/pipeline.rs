use std::fmt::Display;

use itertools::Itertools;
use log::{
    info,
    warn,
};
use rayon::prelude::*;

use super::brute_force::BruteForceMatch;
use super::collate::{
    collate,
    mirror_matches,
};
use super::correlation::{
    CorrelationMatrix,
    SimilarPair,
};
use super::exact::exact_value_match;
use super::minimum::MinimumProfile;
use super::offset::{
    align_at,
    discover_offset,
};
use crate::config::ReconcileConfig;
use crate::data_structs::{
    ColumnMetadata,
    ExpressionMatrix,
    MatchMap,
    MatchOutcome,
    OffsetMatch,
    ResultTable,
    StatusTable,
};

/// The loaded inputs. Nothing in the pipeline mutates them.
#[derive(Debug, Clone)]
pub struct ReconcileInputs {
    /// Published drug-response table (A).
    pub published: ExpressionMatrix,
    /// Reference cell-line panel (B).
    pub reference: ExpressionMatrix,
    /// Patient-cohort dataset (C).
    pub cohort:    ExpressionMatrix,
    /// One record per column of `published`.
    pub metadata:  ColumnMetadata,
    /// Status of cohort samples.
    pub status:    StatusTable,
}

/// Everything derived during a run.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub nci60_matches:    MatchMap,
    pub correlation:      CorrelationMatrix,
    pub high_similarity:  Vec<SimilarPair>,
    pub minimums:         MinimumProfile,
    /// Published columns whose minimum equals the configured sentinel.
    pub sentinel_hits:    Vec<String>,
    pub offset:           RunOffset,
    /// Per probe column, the best alignment found while discovering `offset`.
    pub offset_discovery: Vec<OffsetMatch>,
    /// Alignment of every brute-force match at `offset`.
    pub alignments:       Vec<OffsetMatch>,
    /// One count matrix per offset evaluated: none when the offset is
    /// unconfirmed, several when probe columns disagree.
    pub brute_force:      Vec<BruteForceMatch>,
    /// Target-drug columns paired with cohort columns.
    pub cohort_matches:   MatchMap,
    /// `cohort_matches` plus the relabelled copy onto the mirror drug.
    pub geo_matches:      MatchMap,
    pub table:            ResultTable,
}

/// How the row offset between published and cohort rows was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOffset {
    /// Every alignment above the threshold agrees on this offset.
    Discovered(usize),
    /// Nothing passed the threshold; the single candidate offset is used.
    Given(usize),
    /// Nothing passed the threshold and no single candidate was given.
    Unconfirmed,
    /// Alignments above the threshold disagree; offsets sorted ascending.
    Conflicting(Vec<usize>),
}

impl RunOffset {
    /// The offset used for brute-force matching, if one was settled.
    pub fn offset(&self) -> Option<usize> {
        match self {
            RunOffset::Discovered(offset) | RunOffset::Given(offset) => Some(*offset),
            RunOffset::Unconfirmed | RunOffset::Conflicting(_) => None,
        }
    }
}

impl Display for RunOffset {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            RunOffset::Discovered(offset) => write!(f, "{} (discovered)", offset),
            RunOffset::Given(offset) => write!(f, "{} (given)", offset),
            RunOffset::Unconfirmed => write!(f, "unconfirmed"),
            RunOffset::Conflicting(offsets) => {
                write!(f, "conflicting: {}", offsets.iter().join(", "))
            },
        }
    }
}

/// Finds the row offset between published and cohort rows.
///
/// Each probe column is aligned against every cohort column; alignments with
/// more than `match_threshold` equal rows confirm their offset. Failing to
/// confirm an offset is not an error: it is reported through [`RunOffset`].
pub fn discover_run_offset(
    published: &ExpressionMatrix,
    probe_columns: &[String],
    cohort: &ExpressionMatrix,
    candidates: &[usize],
    match_threshold: usize,
) -> anyhow::Result<(RunOffset, Vec<OffsetMatch>)> {
    let discovered = probe_columns
        .par_iter()
        .map(|sample| {
            let values = published.column_by_name(sample)?;
            discover_offset(sample, values, cohort, candidates)
        })
        .collect::<anyhow::Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect_vec();

    let confirmed = discovered
        .iter()
        .filter(|m| m.match_count > match_threshold)
        .map(|m| m.offset)
        .sorted_unstable()
        .dedup()
        .collect_vec();

    let run_offset = match (confirmed.as_slice(), candidates) {
        ([offset], _) => {
            info!("Row offset {} confirmed", offset);
            RunOffset::Discovered(*offset)
        },
        ([], [given]) => {
            warn!(
                "No probe column aligns with the cohort above {} matching rows, using \
                 the given offset {}",
                match_threshold, given
            );
            RunOffset::Given(*given)
        },
        ([], _) => {
            warn!(
                "No probe column aligns with the cohort above {} matching rows",
                match_threshold
            );
            RunOffset::Unconfirmed
        },
        (many, _) => {
            warn!("Probe columns disagree on the row offset: {:?}", many);
            RunOffset::Conflicting(many.to_vec())
        },
    };
    Ok((run_offset, discovered))
}

/// Pairs target columns with cohort columns once the offset is settled.
///
/// With an unconfirmed offset every column stays unresolved. With
/// conflicting offsets every column that passes the threshold at any of them
/// is ambiguous, listing its candidates in offset order.
fn match_cohort(
    published: &ExpressionMatrix,
    target_samples: &[String],
    cohort: &ExpressionMatrix,
    run_offset: &RunOffset,
    match_threshold: usize,
) -> anyhow::Result<(Vec<BruteForceMatch>, MatchMap)> {
    let offsets = match run_offset {
        RunOffset::Discovered(offset) | RunOffset::Given(offset) => vec![*offset],
        RunOffset::Conflicting(offsets) => offsets.clone(),
        RunOffset::Unconfirmed => Vec::new(),
    };
    let brute_force = offsets
        .into_iter()
        .map(|offset| {
            BruteForceMatch::compute(published, target_samples, cohort, offset, match_threshold)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let matches: MatchMap = match (run_offset, brute_force.as_slice()) {
        (RunOffset::Discovered(_) | RunOffset::Given(_), [single]) => single.outcomes().clone(),
        _ => target_samples
            .iter()
            .map(|sample| {
                let candidates = brute_force
                    .iter()
                    .flat_map(|b| b.outcomes().outcome_for(sample).candidates().to_vec())
                    .unique()
                    .collect_vec();
                let outcome = if candidates.is_empty() {
                    MatchOutcome::Unresolved
                }
                else {
                    MatchOutcome::Ambiguous(candidates)
                };
                (sample.clone(), outcome)
            })
            .collect(),
    };
    Ok((brute_force, matches))
}

/// Runs the whole reconciliation: exact-value matching against the
/// reference panel, correlation and minimum profiling of the published table,
/// offset discovery and brute-force matching against the cohort, relabel copy
/// and collation.
pub fn reconcile(
    inputs: &ReconcileInputs,
    config: &ReconcileConfig,
) -> anyhow::Result<Reconciliation> {
    config.validate()?;
    let ReconcileInputs {
        published,
        reference,
        cohort,
        metadata,
        status,
    } = inputs;
    metadata.validate_against(published)?;

    let nci60_matches = exact_value_match(published, reference, &config.anchor_probe)?;

    let correlation = CorrelationMatrix::compute(published);
    let high_similarity = correlation.high_similarity_pairs(config.correlation_threshold);
    info!(
        "{} column pairs correlate above {}",
        high_similarity.len(),
        config.correlation_threshold
    );

    let minimums = MinimumProfile::compute(published, metadata)?;
    let sentinel_hits = config
        .sentinel_minimum
        .map(|sentinel| {
            minimums
                .sentinel_hits(sentinel)
                .into_iter()
                .map(|r| r.sample_id.clone())
                .collect_vec()
        })
        .unwrap_or_default();
    if let Some(sentinel) = config.sentinel_minimum {
        info!("{} columns have the sentinel minimum {}", sentinel_hits.len(), sentinel);
    }

    let target_samples = metadata
        .filter_drug(&config.target_drug)
        .into_iter()
        .map(|r| r.sample_id.clone())
        .collect_vec();
    anyhow::ensure!(
        !target_samples.is_empty(),
        "No columns with drug name '{}'",
        config.target_drug
    );

    let probe_columns = if config.offset_probe_columns.is_empty() {
        target_samples.clone()
    }
    else {
        config.offset_probe_columns.clone()
    };
    let (offset, offset_discovery) = discover_run_offset(
        published,
        &probe_columns,
        cohort,
        &config.candidate_offsets,
        config.match_threshold,
    )?;

    let (brute_force, cohort_matches) = match_cohort(
        published,
        &target_samples,
        cohort,
        &offset,
        config.match_threshold,
    )?;

    let alignments = match offset.offset() {
        Some(offset) => {
            cohort_matches
                .iter()
                .filter_map(|(a, outcome)| outcome.matched().map(|c| (a, c)))
                .map(|(a, c)| align_at(a, published.column_by_name(a)?, cohort, c, offset))
                .collect::<anyhow::Result<Vec<_>>>()?
        },
        None => Vec::new(),
    };
    for alignment in alignments
        .iter()
        .filter(|m| !m.is_aligned(config.max_reordered_tail))
    {
        warn!(
            "{} vs {}: {} of {} rows differ from row {} on (tail multiset equal: {})",
            alignment.a_sample,
            alignment.c_sample,
            alignment.mismatch_rows.len(),
            alignment.n_rows,
            alignment.aligned_prefix,
            alignment.tail_multiset_equal
        );
    }

    let geo_matches = match config.mirror_drug.as_deref() {
        Some(mirror) => {
            mirror_matches(
                metadata,
                &cohort_matches,
                &config.target_drug,
                mirror,
                config.relabel,
            )?
        },
        None => cohort_matches.clone(),
    };

    let table = collate(metadata, &nci60_matches, &geo_matches, status);

    Ok(Reconciliation {
        nci60_matches,
        correlation,
        high_similarity,
        minimums,
        sentinel_hits,
        offset,
        offset_discovery,
        alignments,
        brute_force,
        cohort_matches,
        geo_matches,
        table,
    })
}
