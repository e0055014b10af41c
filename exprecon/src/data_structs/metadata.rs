use std::fmt::Display;

use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::matrix::ExpressionMatrix;
use crate::error::ReconcileError;
use crate::utils::{
    int_column,
    string_column,
};

/// Binary comparison arm of a sample within its drug.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContrastGroup {
    Zero,
    One,
}

impl ContrastGroup {
    pub const BOTH: [ContrastGroup; 2] = [ContrastGroup::Zero, ContrastGroup::One];

    pub fn flipped(self) -> Self {
        match self {
            ContrastGroup::Zero => ContrastGroup::One,
            ContrastGroup::One => ContrastGroup::Zero,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            ContrastGroup::Zero => 0,
            ContrastGroup::One => 1,
        }
    }
}

impl TryFrom<i64> for ContrastGroup {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContrastGroup::Zero),
            1 => Ok(ContrastGroup::One),
            other => anyhow::bail!("Contrast group must be 0 or 1, got {}", other),
        }
    }
}

impl Display for ContrastGroup {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Metadata describing one column of the published table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id:      String,
    pub drug_name:      String,
    pub contrast_group: ContrastGroup,
}

impl SampleRecord {
    pub fn new(
        sample_id: impl Into<String>,
        drug_name: impl Into<String>,
        contrast_group: ContrastGroup,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            drug_name: drug_name.into(),
            contrast_group,
        }
    }
}

/// Ordered, read-only collection of [`SampleRecord`]s keyed by sample id.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    records: Vec<SampleRecord>,
    index:   HashMap<String, usize>,
}

impl ColumnMetadata {
    pub const SAMPLE_ID: &'static str = "sample_id";
    pub const DRUG_NAME: &'static str = "drug_name";
    pub const CONTRAST_GROUP: &'static str = "contrast_group";

    pub fn try_new(records: Vec<SampleRecord>) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.sample_id.clone(), pos).is_some() {
                return Err(ReconcileError::DuplicateIdentifier {
                    id:   record.sample_id.clone(),
                    axis: "metadata sample",
                }
                .into());
            }
        }
        Ok(Self { records, index })
    }

    /// Reads metadata from a frame with `sample_id`, `drug_name` and
    /// `contrast_group` columns.
    pub fn try_from_dataframe(df: &DataFrame) -> anyhow::Result<Self> {
        let ids = string_column(df, Self::SAMPLE_ID)?;
        let drugs = string_column(df, Self::DRUG_NAME)?;
        let groups = int_column(df, Self::CONTRAST_GROUP)?
            .into_iter()
            .map(ContrastGroup::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        let records = itertools::izip!(ids, drugs, groups)
            .map(|(id, drug, group)| SampleRecord::new(id, drug, group))
            .collect_vec();
        Self::try_new(records)
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(
        &self,
        sample_id: &str,
    ) -> Option<&SampleRecord> {
        self.index.get(sample_id).map(|&i| &self.records[i])
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.sample_id.as_str())
    }

    /// Distinct drug names in order of first appearance.
    pub fn drug_names(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.drug_name.as_str())
            .unique()
            .collect()
    }

    /// Records of `drug`, in metadata order.
    pub fn filter_drug(
        &self,
        drug: &str,
    ) -> Vec<&SampleRecord> {
        self.records
            .iter()
            .filter(|r| r.drug_name == drug)
            .collect()
    }

    /// Records of `drug` in contrast arm `group`, in metadata order.
    pub fn filter_arm(
        &self,
        drug: &str,
        group: ContrastGroup,
    ) -> Vec<&SampleRecord> {
        self.records
            .iter()
            .filter(|r| r.drug_name == drug && r.contrast_group == group)
            .collect()
    }

    /// Checks that metadata sample ids and matrix columns agree one-to-one.
    pub fn validate_against(
        &self,
        matrix: &ExpressionMatrix,
    ) -> anyhow::Result<()> {
        let matrix_samples: HashSet<&str> =
            matrix.samples().iter().map(String::as_str).collect();

        let missing_in_matrix = self
            .sample_ids()
            .filter(|id| !matrix_samples.contains(id))
            .map(String::from)
            .collect_vec();
        let missing_in_metadata = matrix
            .samples()
            .iter()
            .filter(|s| !self.index.contains_key(s.as_str()))
            .cloned()
            .collect_vec();

        if missing_in_matrix.is_empty() && missing_in_metadata.is_empty() {
            Ok(())
        }
        else {
            Err(ReconcileError::MetadataMismatch {
                missing_in_matrix,
                missing_in_metadata,
            }
            .into())
        }
    }
}

/// External per-sample status annotation for the cohort table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTable {
    statuses: HashMap<String, String>,
}

impl StatusTable {
    pub const SAMPLE_ID: &'static str = "sample_id";
    pub const STATUS: &'static str = "status";

    /// Reads statuses from a frame with `sample_id` and `status` columns.
    pub fn try_from_dataframe(df: &DataFrame) -> anyhow::Result<Self> {
        let ids = string_column(df, Self::SAMPLE_ID)?;
        let statuses = string_column(df, Self::STATUS)?;
        Ok(ids.into_iter().zip(statuses).collect())
    }

    pub fn get(
        &self,
        sample_id: &str,
    ) -> Option<&str> {
        self.statuses.get(sample_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl FromIterator<(String, String)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}
