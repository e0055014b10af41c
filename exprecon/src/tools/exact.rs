use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};

use crate::data_structs::{
    ExpressionMatrix,
    MatchMap,
    MatchOutcome,
};

/// Maps every column of `published` to the column of `reference` holding
/// exactly the same value at `anchor_probe`.
///
/// The anchor must exist in both matrices; this is checked before any
/// comparison. Equality is exact floating-point equality. A column with no
/// equal value is [`MatchOutcome::Unresolved`], one with several is
/// [`MatchOutcome::Ambiguous`].
pub fn exact_value_match(
    published: &ExpressionMatrix,
    reference: &ExpressionMatrix,
    anchor_probe: &str,
) -> anyhow::Result<MatchMap> {
    let a_row = published.require_probe(anchor_probe)?;
    let b_row = reference.require_probe(anchor_probe)?;

    let reference_values = reference.row(b_row);
    let map: MatchMap = published
        .samples()
        .iter()
        .zip(published.columns())
        .map(|(sample, values)| {
            let value = values[a_row];
            let candidates = reference
                .samples()
                .iter()
                .zip(reference_values.iter())
                .filter(|(_, &ref_value)| ref_value == value)
                .map(|(ref_sample, _)| ref_sample.clone())
                .collect_vec();
            let outcome = MatchOutcome::from_candidates(candidates);
            match &outcome {
                MatchOutcome::Ambiguous(c) => warn!(
                    "{}: {} reference columns share value {}",
                    sample,
                    c.len(),
                    value
                ),
                MatchOutcome::Unresolved => {
                    debug!("{}: no reference column has value {}", sample, value)
                },
                MatchOutcome::Matched(m) => debug!("{} -> {}", sample, m),
            }
            (sample.clone(), outcome)
        })
        .collect();

    let summary = map.summary();
    info!(
        "Exact-value match on '{}': {} matched, {} unresolved, {} ambiguous",
        anchor_probe, summary.matched, summary.unresolved, summary.ambiguous
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use rstest::{
        fixture,
        rstest,
    };

    use super::*;
    use crate::error::ReconcileError;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[fixture]
    fn published() -> ExpressionMatrix {
        ExpressionMatrix::try_new(
            "published",
            vec!["anchor".into(), "other".into()],
            labels("a", 3),
            vec![vec![1.5, 0.0], vec![2.5, 0.0], vec![9.0, 0.0]],
        )
        .unwrap()
    }

    #[fixture]
    fn reference() -> ExpressionMatrix {
        ExpressionMatrix::try_new(
            "reference",
            vec!["x".into(), "anchor".into()],
            labels("b", 4),
            vec![
                vec![0.0, 2.5],
                vec![0.0, 1.5],
                vec![0.0, 7.0],
                vec![0.0, 2.5],
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_exact_match(
        published: ExpressionMatrix,
        reference: ExpressionMatrix,
    ) -> anyhow::Result<()> {
        let map = exact_value_match(&published, &reference, "anchor")?;
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("a0"), Some(&MatchOutcome::Matched("b1".into())));
        assert_eq!(
            map.get("a1"),
            Some(&MatchOutcome::Ambiguous(vec!["b0".into(), "b3".into()]))
        );
        assert_eq!(map.get("a2"), Some(&MatchOutcome::Unresolved));
        Ok(())
    }

    #[rstest]
    fn test_deterministic(
        published: ExpressionMatrix,
        reference: ExpressionMatrix,
    ) -> anyhow::Result<()> {
        let first = exact_value_match(&published, &reference, "anchor")?;
        let second = exact_value_match(&published, &reference, "anchor")?;
        assert_eq!(first, second);
        Ok(())
    }

    #[rstest]
    #[case::absent_everywhere("nope", "published")]
    #[case::absent_in_reference("other", "reference")]
    fn test_missing_anchor(
        published: ExpressionMatrix,
        reference: ExpressionMatrix,
        #[case] probe: &str,
        #[case] matrix: &str,
    ) {
        let err = exact_value_match(&published, &reference, probe).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ReconcileError>(),
            Some(&ReconcileError::MissingAnchor {
                probe:  probe.into(),
                matrix: matrix.into(),
            })
        );
    }
}
