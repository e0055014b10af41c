use itertools::Itertools;
use log::{
    info,
    warn,
};
use polars::prelude::*;
use rayon::prelude::*;

use crate::data_structs::ExpressionMatrix;
use crate::utils::pearson_r;

/// Symmetric matrix of pairwise Pearson correlations between the columns of
/// an [`ExpressionMatrix`], rows being observations.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    samples: Vec<String>,
    values:  Vec<Vec<f64>>,
}

/// A pair of distinct columns whose correlation exceeds a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarPair {
    pub left:        String,
    pub right:       String,
    pub correlation: f64,
}

impl CorrelationMatrix {
    /// Computes the full correlation matrix. Only the upper triangle is
    /// evaluated; the lower one is mirrored and the diagonal is set to `1.0`.
    pub fn compute(matrix: &ExpressionMatrix) -> Self {
        let n = matrix.n_cols();
        let columns = matrix.columns();

        for (sample, column) in matrix.samples().iter().zip(columns.iter()) {
            if column.iter().all_equal() {
                warn!(
                    "Column '{}' of '{}' is constant; its correlations are 0",
                    sample,
                    matrix.name()
                );
            }
        }

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i + 1..n)
                    .map(|j| pearson_r(&columns[i], &columns[j]))
                    .collect_vec()
            })
            .collect();

        let mut values = vec![vec![1.0; n]; n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, r) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        info!(
            "Computed {}x{} correlation matrix for '{}'",
            n,
            n,
            matrix.name()
        );
        Self {
            samples: matrix.samples().to_vec(),
            values,
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(
        &self,
        i: usize,
        j: usize,
    ) -> f64 {
        self.values[i][j]
    }

    /// `correlation > threshold` for every cell. The diagonal is included, so
    /// it is `true` for any threshold below `1.0`.
    pub fn above(
        &self,
        threshold: f64,
    ) -> Vec<Vec<bool>> {
        self.values
            .iter()
            .map(|row| row.iter().map(|&r| r > threshold).collect())
            .collect()
    }

    /// Distinct pairs (`i < j`) with correlation strictly above `threshold`.
    pub fn high_similarity_pairs(
        &self,
        threshold: f64,
    ) -> Vec<SimilarPair> {
        (0..self.len())
            .tuple_combinations()
            .filter(|&(i, j)| self.values[i][j] > threshold)
            .map(|(i, j)| {
                SimilarPair {
                    left:        self.samples[i].clone(),
                    right:       self.samples[j].clone(),
                    correlation: self.values[i][j],
                }
            })
            .collect()
    }

    /// Square frame with a leading `sample` column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.len() + 1);
        columns.push(Column::new("sample".into(), &self.samples));
        for (sample, row) in self.samples.iter().zip(self.values.iter()) {
            columns.push(Column::new(sample.as_str().into(), row));
        }
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{
        Rng,
        SeedableRng,
    };
    use rstest::rstest;

    use super::*;

    fn random_matrix(
        seed: u64,
        rows: usize,
        cols: usize,
    ) -> ExpressionMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let columns = (0..cols)
            .map(|_| (0..rows).map(|_| rng.gen_range(0.0..16.0)).collect())
            .collect();
        ExpressionMatrix::try_new(
            "random",
            (0..rows).map(|i| format!("p{}", i)).collect(),
            (0..cols).map(|i| format!("s{}", i)).collect(),
            columns,
        )
        .unwrap()
    }

    #[rstest]
    #[case(1, 50, 6)]
    #[case(2, 200, 12)]
    #[case(3, 3, 2)]
    fn test_symmetric_unit_diagonal(
        #[case] seed: u64,
        #[case] rows: usize,
        #[case] cols: usize,
    ) {
        let corr = CorrelationMatrix::compute(&random_matrix(seed, rows, cols));
        assert_eq!(corr.len(), cols);
        for i in 0..cols {
            assert_approx_eq!(corr.get(i, i), 1.0, 1e-12);
            for j in 0..cols {
                assert_approx_eq!(corr.get(i, j), corr.get(j, i), 1e-12);
                assert!(corr.get(i, j) <= 1.0 + 1e-12);
                assert!(corr.get(i, j) >= -1.0 - 1e-12);
            }
        }
    }

    #[test]
    fn test_duplicate_columns_flagged() {
        let base = random_matrix(7, 100, 3);
        let mut columns = base.columns().to_vec();
        // Near-duplicate of column 0
        columns.push(columns[0].iter().map(|v| v * 2.0 + 1.0).collect());
        let samples = vec!["s0", "s1", "s2", "dup"]
            .into_iter()
            .map(String::from)
            .collect();
        let matrix =
            ExpressionMatrix::try_new("dup", base.probes().to_vec(), samples, columns)
                .unwrap();

        let corr = CorrelationMatrix::compute(&matrix);
        let pairs = corr.high_similarity_pairs(0.99);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left, "s0");
        assert_eq!(pairs[0].right, "dup");
        assert_approx_eq!(pairs[0].correlation, 1.0, 1e-12);

        let flags = corr.above(0.99);
        assert!(flags[0][3] && flags[3][0]);
        assert!(flags[1][1]);
        assert!(!flags[1][2]);
    }

    #[test]
    fn test_to_dataframe() -> anyhow::Result<()> {
        let corr = CorrelationMatrix::compute(&random_matrix(11, 20, 4));
        let df = corr.to_dataframe()?;
        assert_eq!(df.shape(), (4, 5));
        Ok(())
    }
}
