use std::io::Cursor;

use polars::prelude::*;
use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::error::ReconcileError;

#[fixture]
fn metadata() -> ColumnMetadata {
    ColumnMetadata::try_new(vec![
        SampleRecord::new("s1", "drugA", ContrastGroup::Zero),
        SampleRecord::new("s2", "drugA", ContrastGroup::One),
        SampleRecord::new("s3", "drugB", ContrastGroup::Zero),
    ])
    .unwrap()
}

#[fixture]
fn matrix() -> ExpressionMatrix {
    ExpressionMatrix::try_new(
        "A",
        vec!["p1".into(), "p2".into()],
        vec!["s1".into(), "s2".into(), "s3".into()],
        vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
    )
    .unwrap()
}

#[rstest]
fn test_metadata_filters(metadata: ColumnMetadata) {
    assert_eq!(metadata.drug_names(), vec!["drugA", "drugB"]);
    assert_eq!(metadata.filter_drug("drugA").len(), 2);
    let arm = metadata.filter_arm("drugA", ContrastGroup::One);
    assert_eq!(arm.len(), 1);
    assert_eq!(arm[0].sample_id, "s2");
    assert_eq!(metadata.get("s3").map(|r| r.drug_name.as_str()), Some("drugB"));
}

#[rstest]
fn test_metadata_validates(
    metadata: ColumnMetadata,
    matrix: ExpressionMatrix,
) {
    assert!(metadata.validate_against(&matrix).is_ok());
}

#[rstest]
fn test_metadata_mismatch_both_ways(matrix: ExpressionMatrix) {
    let metadata = ColumnMetadata::try_new(vec![
        SampleRecord::new("s1", "drugA", ContrastGroup::Zero),
        SampleRecord::new("s2", "drugA", ContrastGroup::One),
        SampleRecord::new("s9", "drugB", ContrastGroup::Zero),
    ])
    .unwrap();
    let err = metadata.validate_against(&matrix).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ReconcileError>(),
        Some(&ReconcileError::MetadataMismatch {
            missing_in_matrix:   vec!["s9".into()],
            missing_in_metadata: vec!["s3".into()],
        })
    );
}

#[test]
fn test_metadata_rejects_duplicates() {
    let res = ColumnMetadata::try_new(vec![
        SampleRecord::new("s1", "drugA", ContrastGroup::Zero),
        SampleRecord::new("s1", "drugB", ContrastGroup::One),
    ]);
    assert!(res.is_err());
}

#[test]
fn test_metadata_from_dataframe() -> anyhow::Result<()> {
    let df = DataFrame::new(vec![
        Column::new("sample_id".into(), ["s1", "s2"]),
        Column::new("drug_name".into(), ["drugA", "drugA"]),
        Column::new("contrast_group".into(), [0i64, 1]),
    ])?;
    let metadata = ColumnMetadata::try_from_dataframe(&df)?;
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata.records()[1].contrast_group, ContrastGroup::One);

    let bad = DataFrame::new(vec![
        Column::new("sample_id".into(), ["s1"]),
        Column::new("drug_name".into(), ["drugA"]),
        Column::new("contrast_group".into(), [2i64]),
    ])?;
    assert!(ColumnMetadata::try_from_dataframe(&bad).is_err());
    Ok(())
}

#[test]
fn test_contrast_group() {
    assert_eq!(ContrastGroup::Zero.flipped(), ContrastGroup::One);
    assert_eq!(ContrastGroup::One.flipped(), ContrastGroup::Zero);
    assert_eq!(ContrastGroup::One.to_string(), "1");
}

#[fixture]
fn result_table() -> ResultTable {
    ResultTable::new(vec![
        ResultRow {
            sample_id:      "s1".into(),
            drug_name:      "drugA".into(),
            contrast_group: ContrastGroup::Zero,
            nci60_match:    MatchOutcome::Matched("NCI_1".into()),
            geo_match:      MatchOutcome::Matched("GSM1".into()),
            geo_status:     Some("responder".into()),
        },
        ResultRow {
            sample_id:      "s2".into(),
            drug_name:      "drugA".into(),
            contrast_group: ContrastGroup::One,
            nci60_match:    MatchOutcome::Ambiguous(vec!["NCI_2".into(), "NCI_3".into()]),
            geo_match:      MatchOutcome::Unresolved,
            geo_status:     None,
        },
    ])
}

#[rstest]
fn test_result_table_snapshot(result_table: ResultTable) -> anyhow::Result<()> {
    let mut buffer = Vec::new();
    result_table.to_file(&mut buffer)?;
    let restored = ResultTable::from_file(&mut Cursor::new(buffer))?;
    assert_eq!(restored, result_table);
    Ok(())
}

#[rstest]
fn test_result_table_nulls(result_table: ResultTable) -> anyhow::Result<()> {
    let df = result_table.to_dataframe()?;
    assert_eq!(df.shape(), (2, ResultTable::COLUMNS.len()));
    assert_eq!(df.column("nci60_match")?.null_count(), 1);
    assert_eq!(df.column("geo_match")?.null_count(), 1);
    assert_eq!(df.column("geo_status")?.null_count(), 1);
    Ok(())
}
