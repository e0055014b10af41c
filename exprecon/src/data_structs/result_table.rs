use std::io::{
    Read,
    Write,
};

use itertools::Itertools;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::metadata::ContrastGroup;
use super::outcome::MatchOutcome;

/// One collated row per published column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub sample_id:      String,
    pub drug_name:      String,
    pub contrast_group: ContrastGroup,
    /// Match in the reference panel (B).
    pub nci60_match:    MatchOutcome,
    /// Match in the cohort dataset (C).
    pub geo_match:      MatchOutcome,
    /// External status of the matched cohort sample.
    pub geo_status:     Option<String>,
}

/// The final annotated table. Row order always equals the metadata order it
/// was collated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub const COLUMNS: [&'static str; 6] = [
        "sample_id",
        "drug_name",
        "contrast_group",
        "nci60_match",
        "geo_match",
        "geo_status",
    ];

    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.sample_id.as_str())
    }

    /// Flattens the table. Unresolved and ambiguous matches become nulls.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let [sample_id, drug_name, contrast_group, nci60, geo, status] =
            Self::COLUMNS;
        DataFrame::new(vec![
            Column::new(
                sample_id.into(),
                self.rows.iter().map(|r| r.sample_id.as_str()).collect_vec(),
            ),
            Column::new(
                drug_name.into(),
                self.rows.iter().map(|r| r.drug_name.as_str()).collect_vec(),
            ),
            Column::new(
                contrast_group.into(),
                self.rows
                    .iter()
                    .map(|r| r.contrast_group.as_i32())
                    .collect_vec(),
            ),
            Column::new(
                nci60.into(),
                self.rows
                    .iter()
                    .map(|r| r.nci60_match.matched())
                    .collect_vec(),
            ),
            Column::new(
                geo.into(),
                self.rows.iter().map(|r| r.geo_match.matched()).collect_vec(),
            ),
            Column::new(
                status.into(),
                self.rows
                    .iter()
                    .map(|r| r.geo_status.as_deref())
                    .collect_vec(),
            ),
        ])
    }

    /// Serializes the table to a writer using bincode.
    pub fn to_file<W: Write>(
        &self,
        writer: &mut W,
    ) -> Result<(), bincode::error::EncodeError> {
        let config = bincode::config::standard();
        bincode::serde::encode_into_std_write(self, writer, config)?;
        Ok(())
    }

    /// Deserializes a table from a reader using bincode.
    pub fn from_file<R: Read>(
        reader: &mut R
    ) -> Result<Self, bincode::error::DecodeError> {
        let config = bincode::config::standard();
        bincode::serde::decode_from_std_read(reader, config)
    }
}

impl FromIterator<ResultRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
