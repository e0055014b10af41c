use std::collections::BTreeMap;

use log::{
    debug,
    info,
};

use crate::data_structs::{
    ColumnMetadata,
    ExpressionMatrix,
};

/// Minimum of every column, in column order. Empty columns yield
/// `f64::INFINITY`; `NaN` values are skipped.
pub fn column_minimums(matrix: &ExpressionMatrix) -> Vec<f64> {
    matrix
        .columns()
        .iter()
        .map(|c| c.iter().copied().fold(f64::INFINITY, f64::min))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMinimum {
    pub sample_id: String,
    pub drug_name: String,
    pub minimum:   f64,
}

/// Per-column minimums of the published table, annotated with each column's
/// drug. Columns sharing a minimum (in particular the global one) are
/// expected: it points at a common source for those columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumProfile {
    records: Vec<ColumnMinimum>,
}

impl MinimumProfile {
    /// Builds the profile after checking that metadata and matrix columns
    /// agree one-to-one. Records follow matrix column order.
    pub fn compute(
        matrix: &ExpressionMatrix,
        metadata: &ColumnMetadata,
    ) -> anyhow::Result<Self> {
        metadata.validate_against(matrix)?;

        let records: Vec<ColumnMinimum> = matrix
            .samples()
            .iter()
            .zip(column_minimums(matrix))
            .map(|(sample, minimum)| {
                // validated above
                let drug_name = metadata
                    .get(sample)
                    .map(|r| r.drug_name.clone())
                    .unwrap_or_default();
                ColumnMinimum {
                    sample_id: sample.clone(),
                    drug_name,
                    minimum,
                }
            })
            .collect();

        let profile = Self { records };
        if let Some(global) = profile.global_minimum() {
            info!(
                "Global minimum {} shared by {} of {} columns",
                global,
                profile.at_global_minimum().len(),
                profile.records.len()
            );
        }
        Ok(profile)
    }

    pub fn records(&self) -> &[ColumnMinimum] {
        &self.records
    }

    pub fn minimums(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.minimum).collect()
    }

    /// Minimums grouped by drug name, each group in column order.
    pub fn group_minimums(&self) -> BTreeMap<&str, Vec<f64>> {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in self.records.iter() {
            groups
                .entry(record.drug_name.as_str())
                .or_default()
                .push(record.minimum);
        }
        groups
    }

    pub fn global_minimum(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.minimum)
            .filter(|m| m.is_finite())
            .min_by(f64::total_cmp)
    }

    pub fn at_global_minimum(&self) -> Vec<&ColumnMinimum> {
        match self.global_minimum() {
            Some(global) => self.sentinel_hits(global),
            None => Vec::new(),
        }
    }

    /// Columns whose minimum is exactly `sentinel`.
    pub fn sentinel_hits(
        &self,
        sentinel: f64,
    ) -> Vec<&ColumnMinimum> {
        let hits: Vec<&ColumnMinimum> = self
            .records
            .iter()
            .filter(|r| r.minimum == sentinel)
            .collect();
        debug!("{} columns have minimum {}", hits.len(), sentinel);
        hits
    }
}

#[cfg(test)]
mod tests {
    use rstest::{
        fixture,
        rstest,
    };

    use super::*;
    use crate::data_structs::{
        ContrastGroup,
        SampleRecord,
    };
    use crate::error::ReconcileError;

    #[fixture]
    fn matrix() -> ExpressionMatrix {
        ExpressionMatrix::try_new(
            "published",
            vec!["p1".into(), "p2".into(), "p3".into()],
            vec!["s1".into(), "s2".into(), "s3".into(), "s4".into()],
            vec![
                vec![3.0, 2.1, 5.0],
                vec![2.1, 9.0, 4.0],
                vec![7.0, 6.5, 8.0],
                vec![f64::NAN, 2.1, 3.3],
            ],
        )
        .unwrap()
    }

    #[fixture]
    fn metadata() -> ColumnMetadata {
        ColumnMetadata::try_new(vec![
            SampleRecord::new("s1", "drugA", ContrastGroup::Zero),
            SampleRecord::new("s2", "drugA", ContrastGroup::One),
            SampleRecord::new("s3", "drugB", ContrastGroup::Zero),
            SampleRecord::new("s4", "drugB", ContrastGroup::One),
        ])
        .unwrap()
    }

    #[rstest]
    fn test_column_minimums(matrix: ExpressionMatrix) {
        assert_eq!(column_minimums(&matrix), vec![2.1, 2.1, 6.5, 2.1]);
    }

    #[rstest]
    fn test_profile(
        matrix: ExpressionMatrix,
        metadata: ColumnMetadata,
    ) -> anyhow::Result<()> {
        let profile = MinimumProfile::compute(&matrix, &metadata)?;
        assert_eq!(profile.global_minimum(), Some(2.1));

        let tied = profile
            .at_global_minimum()
            .into_iter()
            .map(|r| r.sample_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(tied, vec!["s1", "s2", "s4"]);

        let groups = profile.group_minimums();
        assert_eq!(groups["drugA"], vec![2.1, 2.1]);
        assert_eq!(groups["drugB"], vec![6.5, 2.1]);

        assert_eq!(profile.sentinel_hits(6.5).len(), 1);
        assert!(profile.sentinel_hits(0.0).is_empty());
        Ok(())
    }

    #[rstest]
    fn test_profile_rejects_mismatched_metadata(matrix: ExpressionMatrix) {
        let metadata = ColumnMetadata::try_new(vec![SampleRecord::new(
            "s1",
            "drugA",
            ContrastGroup::Zero,
        )])
        .unwrap();
        let err = MinimumProfile::compute(&matrix, &metadata).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconcileError>(),
            Some(ReconcileError::MetadataMismatch { .. })
        ));
    }
}
