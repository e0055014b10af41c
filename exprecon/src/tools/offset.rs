use log::{
    debug,
    info,
};

use super::brute_force::count_matches;
use crate::data_structs::{
    ExpressionMatrix,
    OffsetMatch,
};
use crate::error::ReconcileError;
use crate::utils::multiset_eq;

/// Checks that `len` rows starting at `offset` fit into `rows`.
pub fn check_offset_bounds(
    offset: usize,
    len: usize,
    rows: usize,
) -> Result<(), ReconcileError> {
    match offset.checked_add(len) {
        Some(end) if end <= rows => Ok(()),
        _ => Err(ReconcileError::OffsetOutOfBounds { offset, len, rows }),
    }
}

/// Compares `source[i]` with `target[offset + i]` for every row of `source`.
///
/// Two checks are reported: positional equality (count, leading aligned run,
/// mismatching rows) and whether the rows after the leading run hold the same
/// multiset of values in both slices. The second one tells a reordering of
/// duplicate values apart from a real mismatch.
pub fn align_slices(
    a_sample: &str,
    source: &[f64],
    c_sample: &str,
    target: &[f64],
    offset: usize,
) -> anyhow::Result<OffsetMatch> {
    check_offset_bounds(offset, source.len(), target.len())?;
    let window = &target[offset..offset + source.len()];

    let mismatch_rows: Vec<usize> = source
        .iter()
        .zip(window.iter())
        .enumerate()
        .filter(|(_, (a, c))| a != c)
        .map(|(i, _)| i)
        .collect();
    let aligned_prefix = mismatch_rows.first().copied().unwrap_or(source.len());
    let tail_multiset_equal =
        multiset_eq(&source[aligned_prefix..], &window[aligned_prefix..]);

    Ok(OffsetMatch {
        a_sample: a_sample.to_string(),
        c_sample: c_sample.to_string(),
        offset,
        n_rows: source.len(),
        match_count: source.len() - mismatch_rows.len(),
        aligned_prefix,
        mismatch_rows,
        tail_multiset_equal,
    })
}

/// Aligns a published column against column `c_sample` of `cohort` at a
/// given offset.
pub fn align_at(
    a_sample: &str,
    values: &[f64],
    cohort: &ExpressionMatrix,
    c_sample: &str,
    offset: usize,
) -> anyhow::Result<OffsetMatch> {
    let target = cohort.column_by_name(c_sample)?;
    align_slices(a_sample, values, c_sample, target, offset)
}

/// Offsets to evaluate: the given candidates or, when there are none, every
/// offset at which `len` rows fit into `rows`.
fn offsets_to_try(
    candidates: &[usize],
    len: usize,
    rows: usize,
) -> anyhow::Result<Vec<usize>> {
    if candidates.is_empty() {
        check_offset_bounds(0, len, rows)?;
        Ok((0..=rows - len).collect())
    }
    else {
        for &offset in candidates {
            check_offset_bounds(offset, len, rows)?;
        }
        Ok(candidates.to_vec())
    }
}

/// Evaluates the candidate offsets against one cohort column and returns the
/// alignment with the highest match count. Ties go to the smaller offset.
pub fn best_offset(
    a_sample: &str,
    values: &[f64],
    cohort: &ExpressionMatrix,
    c_sample: &str,
    candidates: &[usize],
) -> anyhow::Result<OffsetMatch> {
    let target = cohort.column_by_name(c_sample)?;
    let mut offsets = offsets_to_try(candidates, values.len(), target.len())?;
    offsets.sort_unstable();
    offsets.dedup();

    let mut best: Option<(usize, usize)> = None;
    for offset in offsets {
        let count = count_matches(values, target, offset)?;
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((offset, count));
        }
    }
    let (offset, _) = best
        .ok_or_else(|| anyhow::anyhow!("No offset to evaluate for '{}'", a_sample))?;
    align_slices(a_sample, values, c_sample, target, offset)
}

/// Searches every cohort column and candidate offset for the alignment of a
/// published column with the most positional matches.
///
/// The scan only counts equal rows; the full alignment is built for the
/// winning pair. Returns `None` when no position matches anywhere. Ties go to
/// the smaller offset, then to the earlier cohort column.
pub fn discover_offset(
    a_sample: &str,
    values: &[f64],
    cohort: &ExpressionMatrix,
    candidates: &[usize],
) -> anyhow::Result<Option<OffsetMatch>> {
    let mut offsets = offsets_to_try(candidates, values.len(), cohort.n_rows())?;
    offsets.sort_unstable();
    offsets.dedup();

    // (offset, cohort column, count)
    let mut best: Option<(usize, usize, usize)> = None;
    for offset in offsets {
        for (c_idx, target) in cohort.columns().iter().enumerate() {
            let count = count_matches(values, target, offset)?;
            if count > best.map_or(0, |(_, _, best_count)| best_count) {
                best = Some((offset, c_idx, count));
            }
        }
    }

    let Some((offset, c_idx, _)) = best
    else {
        debug!("{} does not align with any cohort column", a_sample);
        return Ok(None);
    };
    let c_sample = &cohort.samples()[c_idx];
    let found = align_slices(a_sample, values, c_sample, cohort.column(c_idx), offset)?;
    info!(
        "{} aligns with {} at offset {}: {}/{} rows equal, {} mismatches",
        a_sample,
        found.c_sample,
        found.offset,
        found.match_count,
        found.n_rows,
        found.mismatch_rows.len()
    );
    Ok(Some(found))
}
