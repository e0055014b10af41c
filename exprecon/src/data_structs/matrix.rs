use anyhow::Context;
use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;
use polars::prelude::*;

use crate::error::ReconcileError;
use crate::utils::{
    float_column,
    string_column,
};

/// Builds a label → position index, rejecting duplicated labels.
fn build_index(
    labels: &[String],
    axis: &'static str,
) -> anyhow::Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(labels.len());
    for (pos, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), pos).is_some() {
            return Err(ReconcileError::DuplicateIdentifier {
                id: label.clone(),
                axis,
            }
            .into());
        }
    }
    Ok(index)
}

/// A probes × samples matrix of expression levels.
///
/// Values are stored column-major: every sample column is a contiguous
/// `Vec<f64>` of length [`n_rows`](Self::n_rows). Both axes are labelled and
/// indexed once at construction, so lookups by label never scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    name:         String,
    probes:       Vec<String>,
    samples:      Vec<String>,
    columns:      Vec<Vec<f64>>,
    probe_index:  HashMap<String, usize>,
    sample_index: HashMap<String, usize>,
}

impl ExpressionMatrix {
    /// Creates a matrix from labelled columns.
    ///
    /// Fails if the number of columns differs from the number of samples, if
    /// any column length differs from the number of probes, or if either axis
    /// carries duplicated labels.
    pub fn try_new(
        name: impl Into<String>,
        probes: Vec<String>,
        samples: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        if columns.len() != samples.len() {
            return Err(ReconcileError::ShapeMismatch {
                expected: samples.len(),
                found:    columns.len(),
            })
            .with_context(|| format!("Matrix '{}': column count", name));
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != probes.len()) {
            return Err(ReconcileError::ShapeMismatch {
                expected: probes.len(),
                found:    bad.len(),
            })
            .with_context(|| format!("Matrix '{}': column length", name));
        }
        let probe_index = build_index(&probes, "probe")
            .with_context(|| format!("Matrix '{}'", name))?;
        let sample_index = build_index(&samples, "sample")
            .with_context(|| format!("Matrix '{}'", name))?;

        debug!(
            "Created matrix '{}' with {} probes and {} samples",
            name,
            probes.len(),
            samples.len()
        );

        Ok(Self {
            name,
            probes,
            samples,
            columns,
            probe_index,
            sample_index,
        })
    }

    /// Converts a loaded frame into a matrix. `probe_column` becomes the row
    /// index, every other column is cast to `Float64` and becomes a sample.
    pub fn try_from_dataframe(
        name: impl Into<String>,
        df: &DataFrame,
        probe_column: &str,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let probes = string_column(df, probe_column)
            .with_context(|| format!("Matrix '{}': probe column", name))?;
        let samples = df
            .get_column_names()
            .into_iter()
            .map(|n| n.as_str())
            .filter(|n| *n != probe_column)
            .map(String::from)
            .collect_vec();
        let columns = samples
            .iter()
            .map(|s| float_column(df, s))
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Matrix '{}': sample columns", name))?;
        Self::try_new(name, probes, samples, columns)
    }

    /// Converts the matrix back into a frame with the probe labels as the
    /// first column.
    pub fn to_dataframe(
        &self,
        probe_column: &str,
    ) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.samples.len() + 1);
        columns.push(Column::new(probe_column.into(), &self.probes));
        for (sample, values) in self.samples.iter().zip(self.columns.iter()) {
            columns.push(Column::new(sample.as_str().into(), values));
        }
        DataFrame::new(columns)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn probes(&self) -> &[String] {
        &self.probes
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.probes.len()
    }

    pub fn n_cols(&self) -> usize {
        self.samples.len()
    }

    pub fn probe_position(
        &self,
        probe: &str,
    ) -> Option<usize> {
        self.probe_index.get(probe).copied()
    }

    pub fn sample_position(
        &self,
        sample: &str,
    ) -> Option<usize> {
        self.sample_index.get(sample).copied()
    }

    /// Returns the row position of `probe`, or [`ReconcileError::MissingAnchor`].
    pub fn require_probe(
        &self,
        probe: &str,
    ) -> anyhow::Result<usize> {
        self.probe_position(probe).ok_or_else(|| {
            ReconcileError::MissingAnchor {
                probe:  probe.to_string(),
                matrix: self.name.clone(),
            }
            .into()
        })
    }

    pub fn column(
        &self,
        idx: usize,
    ) -> &[f64] {
        &self.columns[idx]
    }

    /// Returns the values of `sample`, or [`ReconcileError::UnknownSample`].
    pub fn column_by_name(
        &self,
        sample: &str,
    ) -> anyhow::Result<&[f64]> {
        self.sample_position(sample)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| {
                ReconcileError::UnknownSample {
                    sample: sample.to_string(),
                    matrix: self.name.clone(),
                }
                .into()
            })
    }

    /// Values of every sample at row `row`, in column order.
    pub fn row(
        &self,
        row: usize,
    ) -> Vec<f64> {
        self.columns.iter().map(|c| c[row]).collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{
        fixture,
        rstest,
    };

    use super::*;

    #[fixture]
    fn matrix() -> ExpressionMatrix {
        ExpressionMatrix::try_new(
            "A",
            vec!["p1".into(), "p2".into(), "p3".into()],
            vec!["s1".into(), "s2".into()],
            vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]],
        )
        .unwrap()
    }

    #[rstest]
    fn test_lookup(matrix: ExpressionMatrix) {
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 2);
        assert_eq!(matrix.probe_position("p2"), Some(1));
        assert_eq!(matrix.sample_position("s2"), Some(1));
        assert_eq!(matrix.row(2), vec![5.0, 6.0]);
        assert_eq!(matrix.column_by_name("s1").unwrap(), &[1.0, 3.0, 5.0]);
    }

    #[rstest]
    fn test_missing_labels(matrix: ExpressionMatrix) {
        let err = matrix.require_probe("p9").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ReconcileError>(),
            Some(&ReconcileError::MissingAnchor {
                probe:  "p9".into(),
                matrix: "A".into(),
            })
        );
        let err = matrix.column_by_name("s9").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconcileError>(),
            Some(ReconcileError::UnknownSample { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_shape() {
        let res = ExpressionMatrix::try_new(
            "A",
            vec!["p1".into(), "p2".into()],
            vec!["s1".into()],
            vec![vec![1.0]],
        );
        assert!(res.is_err());

        let res = ExpressionMatrix::try_new(
            "A",
            vec!["p1".into()],
            vec!["s1".into(), "s2".into()],
            vec![vec![1.0]],
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_rejects_duplicate_probe() {
        let err = ExpressionMatrix::try_new(
            "A",
            vec!["p1".into(), "p1".into()],
            vec!["s1".into()],
            vec![vec![1.0, 2.0]],
        )
        .unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<ReconcileError>(),
            Some(ReconcileError::DuplicateIdentifier { axis: "probe", .. })
        ));
    }

    #[rstest]
    fn test_dataframe_conversion(matrix: ExpressionMatrix) -> anyhow::Result<()> {
        let df = matrix.to_dataframe("probe")?;
        assert_eq!(df.shape(), (3, 3));
        let restored = ExpressionMatrix::try_from_dataframe("A", &df, "probe")?;
        assert_eq!(restored, matrix);
        Ok(())
    }
}
