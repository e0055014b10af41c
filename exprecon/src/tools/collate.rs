use itertools::Itertools;
use log::{
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    ColumnMetadata,
    ContrastGroup,
    MatchMap,
    ResultRow,
    ResultTable,
    StatusTable,
};
use crate::error::ReconcileError;

/// How contrast arms of one drug map onto the arms of a drug known to share
/// the same underlying samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelabelRule {
    /// Arm 0 of the source corresponds to arm 1 of the target and vice versa.
    #[default]
    Swap,
    /// Arms correspond one-to-one.
    Identity,
}

impl RelabelRule {
    pub fn apply(
        self,
        group: ContrastGroup,
    ) -> ContrastGroup {
        match self {
            RelabelRule::Swap => group.flipped(),
            RelabelRule::Identity => group,
        }
    }
}

/// Copies the matches of `source_drug` onto `target_drug`.
///
/// Within every contrast arm `g` of the source, the n-th sample (in metadata
/// order) passes its outcome to the n-th sample of arm `rule.apply(g)` of the
/// target. Both arms must have the same size. The returned map holds the
/// source outcomes followed by the copied target outcomes.
pub fn mirror_matches(
    metadata: &ColumnMetadata,
    matches: &MatchMap,
    source_drug: &str,
    target_drug: &str,
    rule: RelabelRule,
) -> anyhow::Result<MatchMap> {
    anyhow::ensure!(
        source_drug != target_drug,
        "Cannot mirror drug '{}' onto itself",
        source_drug
    );

    let source_entries = metadata
        .filter_drug(source_drug)
        .into_iter()
        .map(|r| (r.sample_id.clone(), matches.outcome_for(&r.sample_id)))
        .collect_vec();

    let mut copied = Vec::new();
    for group in ContrastGroup::BOTH {
        let sources = metadata.filter_arm(source_drug, group);
        let targets = metadata.filter_arm(target_drug, rule.apply(group));
        if sources.len() != targets.len() {
            return Err(ReconcileError::ShapeMismatch {
                expected: sources.len(),
                found:    targets.len(),
            }
            .into());
        }
        copied.extend(sources.into_iter().zip(targets).map(|(s, t)| {
            (t.sample_id.clone(), matches.outcome_for(&s.sample_id))
        }));
    }

    info!(
        "Mirrored {} matches from '{}' onto '{}' ({:?})",
        copied.len(),
        source_drug,
        target_drug,
        rule
    );
    Ok(source_entries.into_iter().chain(copied).collect())
}

/// Merges metadata, reference-panel matches, cohort matches and cohort status
/// into one row per metadata record, in metadata order.
///
/// Samples absent from a match map are unresolved. The status is looked up
/// only for resolved cohort matches.
pub fn collate(
    metadata: &ColumnMetadata,
    nci60: &MatchMap,
    geo: &MatchMap,
    status: &StatusTable,
) -> ResultTable {
    let table: ResultTable = metadata
        .records()
        .iter()
        .map(|record| {
            let geo_match = geo.outcome_for(&record.sample_id);
            let geo_status = geo_match.matched().and_then(|id| {
                let found = status.get(id).map(String::from);
                if found.is_none() {
                    warn!("No status recorded for cohort sample {}", id);
                }
                found
            });
            ResultRow {
                sample_id: record.sample_id.clone(),
                drug_name: record.drug_name.clone(),
                contrast_group: record.contrast_group,
                nci60_match: nci60.outcome_for(&record.sample_id),
                geo_match,
                geo_status,
            }
        })
        .collect();

    info!("Collated {} result rows", table.len());
    table
}
