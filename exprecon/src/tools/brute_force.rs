use itertools::Itertools;
use log::{
    info,
    warn,
};
use rayon::prelude::*;

use super::offset::check_offset_bounds;
use crate::data_structs::{
    ExpressionMatrix,
    MatchMap,
    MatchOutcome,
};
use crate::error::ReconcileError;

/// Number of rows where `source[i] == target[offset + i]`.
pub fn count_matches(
    source: &[f64],
    target: &[f64],
    offset: usize,
) -> Result<usize, ReconcileError> {
    check_offset_bounds(offset, source.len(), target.len())?;
    Ok(source
        .iter()
        .zip(target[offset..offset + source.len()].iter())
        .filter(|(a, c)| a == c)
        .count())
}

/// Exact-match counts of every selected published column against every
/// cohort column, and the assignment derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BruteForceMatch {
    a_samples: Vec<String>,
    c_samples: Vec<String>,
    /// `counts[a][c]`
    counts:    Vec<Vec<usize>>,
    offset:    usize,
    threshold: usize,
    outcomes:  MatchMap,
}

impl BruteForceMatch {
    /// Counts exact matches for every (published, cohort) column pair after
    /// applying `offset` to the cohort rows.
    ///
    /// A published column is assigned the cohort column whose count is
    /// strictly above `threshold`. When none qualifies it stays unresolved;
    /// when several qualify the pair list is reported as ambiguous and no
    /// column is picked.
    pub fn compute(
        published: &ExpressionMatrix,
        a_samples: &[String],
        cohort: &ExpressionMatrix,
        offset: usize,
        threshold: usize,
    ) -> anyhow::Result<Self> {
        check_offset_bounds(offset, published.n_rows(), cohort.n_rows())?;
        let sources = a_samples
            .iter()
            .map(|s| published.column_by_name(s))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let counts: Vec<Vec<usize>> = sources
            .par_iter()
            .map(|source| {
                cohort
                    .columns()
                    .iter()
                    .map(|target| count_matches(source, target, offset))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;

        let outcomes: MatchMap = a_samples
            .iter()
            .zip(counts.iter())
            .map(|(a_sample, row)| {
                let candidates = cohort
                    .samples()
                    .iter()
                    .zip(row.iter())
                    .filter(|(_, &count)| count > threshold)
                    .map(|(c_sample, _)| c_sample.clone())
                    .collect_vec();
                let outcome = MatchOutcome::from_candidates(candidates);
                if let MatchOutcome::Ambiguous(c) = &outcome {
                    warn!(
                        "{}: {} cohort columns exceed {} matches: {}",
                        a_sample,
                        c.len(),
                        threshold,
                        c.join(", ")
                    );
                }
                (a_sample.clone(), outcome)
            })
            .collect();

        let summary = outcomes.summary();
        info!(
            "Brute-force match of {}x{} columns at offset {}: {} matched, {} \
             unresolved, {} ambiguous",
            a_samples.len(),
            cohort.n_cols(),
            offset,
            summary.matched,
            summary.unresolved,
            summary.ambiguous
        );

        Ok(Self {
            a_samples: a_samples.to_vec(),
            c_samples: cohort.samples().to_vec(),
            counts,
            offset,
            threshold,
            outcomes,
        })
    }

    pub fn a_samples(&self) -> &[String] {
        &self.a_samples
    }

    pub fn c_samples(&self) -> &[String] {
        &self.c_samples
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn outcomes(&self) -> &MatchMap {
        &self.outcomes
    }

    /// Highest count of a published column and the cohort column holding it.
    pub fn best_count(
        &self,
        a_sample: &str,
    ) -> Option<(&str, usize)> {
        let row = self.a_samples.iter().position(|s| s == a_sample)?;
        self.counts[row]
            .iter()
            .enumerate()
            .max_by_key(|(_, &count)| count)
            .map(|(c, &count)| (self.c_samples[c].as_str(), count))
    }
}
