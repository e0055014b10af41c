#![allow(dead_code)]
use exprecon::prelude::*;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

pub const ROWS: usize = 300;
pub const OFFSET: usize = 6;
pub const ANCHOR: &str = "p_10";
pub const TARGET: &str = "erlotinib";
pub const MIRROR: &str = "sorafenib";
pub const OTHER: &str = "lapatinib";
/// Rows at the end of `erl_3` whose order differs from the cohort.
pub const REORDERED_TAIL: usize = 4;
/// Extra cohort column holding a published column at [`SHIFTED_OFFSET`].
pub const SHIFTED: &str = "GSM_shifted";
pub const SHIFTED_OFFSET: usize = 3;

/// A small three-table study with known provenance:
///
/// * `erl_0..erl_3` are cohort columns `GSM0..GSM3` without the first
///   `OFFSET` control probes (`erl_3` with a reordered tail);
/// * `sor_0..sor_3` hold the same data as `erl_*` with swapped contrast arms;
/// * `lap_0`, `lap_1` have no counterpart in the cohort;
/// * the reference panel holds the anchor values of `erl_0`, `lap_0` (twice)
///   and nothing else from the published table.
pub struct SyntheticStudy {
    pub inputs: ReconcileInputs,
}

fn random_column(
    rng: &mut StdRng,
    len: usize,
) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(2.0..14.0)).collect()
}

fn named(
    prefix: &str,
    n: usize,
) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

impl SyntheticStudy {
    pub fn new(seed: u64) -> Self {
        use ContrastGroup::*;
        let mut rng = StdRng::seed_from_u64(seed);

        let cohort_columns: Vec<Vec<f64>> =
            (0..8).map(|_| random_column(&mut rng, ROWS + OFFSET)).collect();
        let cohort_probes: Vec<String> = (0..OFFSET)
            .map(|i| format!("AFFX_{}", i))
            .chain((0..ROWS).map(|i| format!("p_{}", i)))
            .collect();

        let mut erl: Vec<Vec<f64>> = (0..4)
            .map(|i| cohort_columns[i][OFFSET..].to_vec())
            .collect();
        erl[3][ROWS - REORDERED_TAIL..].rotate_left(1);
        let lap: Vec<Vec<f64>> = (0..2).map(|_| random_column(&mut rng, ROWS)).collect();

        let mut published_samples = Vec::new();
        let mut published_columns = Vec::new();
        let mut records = Vec::new();
        let erl_groups = [Zero, Zero, One, One];
        for (i, (values, group)) in erl.iter().zip(erl_groups).enumerate() {
            let id = format!("erl_{}", i);
            published_samples.push(id.clone());
            published_columns.push(values.clone());
            records.push(SampleRecord::new(id, TARGET, group));
        }
        for (i, values) in lap.iter().enumerate() {
            let id = format!("lap_{}", i);
            published_samples.push(id.clone());
            published_columns.push(values.clone());
            records.push(SampleRecord::new(id, OTHER, Zero));
        }
        for (i, (values, group)) in erl.iter().zip(erl_groups).enumerate() {
            let id = format!("sor_{}", i);
            published_samples.push(id.clone());
            published_columns.push(values.clone());
            records.push(SampleRecord::new(id, MIRROR, group.flipped()));
        }

        let published = ExpressionMatrix::try_new(
            "published",
            named("p_", ROWS),
            published_samples,
            published_columns,
        )
        .unwrap();

        let anchor_row = published.require_probe(ANCHOR).unwrap();
        let mut reference_columns: Vec<Vec<f64>> =
            (0..5).map(|_| random_column(&mut rng, ROWS)).collect();
        reference_columns[1][anchor_row] = erl[0][anchor_row];
        reference_columns[2][anchor_row] = lap[0][anchor_row];
        reference_columns[4][anchor_row] = lap[0][anchor_row];
        let reference = ExpressionMatrix::try_new(
            "nci60",
            named("p_", ROWS),
            named("NCI_", 5),
            reference_columns,
        )
        .unwrap();

        let cohort = ExpressionMatrix::try_new(
            "geo",
            cohort_probes,
            named("GSM", 8),
            cohort_columns,
        )
        .unwrap();

        let status: StatusTable = (0..8)
            .map(|i| {
                let status = if i % 2 == 0 { "responder" } else { "non-responder" };
                (format!("GSM{}", i), status.to_string())
            })
            .collect();

        Self {
            inputs: ReconcileInputs {
                published,
                reference,
                cohort,
                metadata: ColumnMetadata::try_new(records).unwrap(),
                status,
            },
        }
    }

    /// Inputs whose cohort gains a [`SHIFTED`] column holding `sample` at
    /// `offset`, surrounded by values found nowhere else.
    pub fn with_shifted_copy(
        &self,
        sample: &str,
        offset: usize,
    ) -> ReconcileInputs {
        let mut inputs = self.inputs.clone();
        let cohort = &inputs.cohort;
        let mut shifted: Vec<f64> = (0..cohort.n_rows()).map(|i| 100.0 + i as f64).collect();
        shifted[offset..offset + ROWS]
            .copy_from_slice(inputs.published.column_by_name(sample).unwrap());

        let mut samples = cohort.samples().to_vec();
        samples.push(SHIFTED.to_string());
        let mut columns = cohort.columns().to_vec();
        columns.push(shifted);
        inputs.cohort =
            ExpressionMatrix::try_new("geo", cohort.probes().to_vec(), samples, columns).unwrap();
        inputs
    }

    pub fn config() -> ReconcileConfig {
        ReconcileConfig::default()
            .with_anchor_probe(ANCHOR.into())
            .with_target_drug(TARGET.into())
            .with_mirror_drug(Some(MIRROR.into()))
            .with_match_threshold(200)
            .with_max_reordered_tail(REORDERED_TAIL)
    }
}
