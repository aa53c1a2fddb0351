use super::*;
use crate::rel::expr::{CmpOp, LiteralValue, Region};
use crate::schema::Tuple;

fn scan_schema() -> Schema {
    Schema::new(vec![
        SchemaElement::new("id", ScalarType::Int32),
        SchemaElement::new("amount", ScalarType::Int32),
    ])
}

fn predicate_over(schema: &Schema) -> Region {
    let mut b = Region::builder(Tuple::new(schema.clone()));
    let amount = b.index_by_name("amount").expect("amount");
    let threshold = b
        .literal(LiteralValue::Integer(100), ScalarType::Int32)
        .expect("literal");
    let flag = b.compare(amount, threshold, CmpOp::Gt).expect("compare");
    b.finish(vec![flag])
}

#[test]
fn test_scan_declares_schema() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let op = plan.op(scan);
    assert_eq!(op.kind(), "full_table_scan");
    assert_eq!(op.input(), None);
    assert_eq!(op.result().schema, scan_schema());
}

#[test]
fn test_select_preserves_schema() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let select = plan
        .select(scan, predicate_over(&scan_schema()))
        .expect("valid select");

    // schema preservation: output == input, verbatim
    assert_eq!(plan.op(select).result().schema, scan_schema());
    assert_eq!(plan.op(select).input(), Some(scan));
}

#[test]
fn test_select_rejects_foreign_tuple_schema() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let foreign = Schema::new(vec![SchemaElement::new("amount", ScalarType::Int32)]);
    let err = plan.select(scan, predicate_over(&foreign)).unwrap_err();
    assert!(matches!(err, IrError::SchemaMismatch { .. }));
}

#[test]
fn test_select_requires_single_boolean_yield() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());

    // two yielded values
    let mut b = Region::builder(Tuple::new(scan_schema()));
    let id = b.index_by_name("id").expect("id");
    let amount = b.index_by_name("amount").expect("amount");
    let flag = b.compare(id, amount, CmpOp::Eq).expect("compare");
    let region = b.finish(vec![flag, flag]);
    let err = plan.select(scan, region).unwrap_err();
    assert!(matches!(
        err,
        IrError::RegionShapeMismatch {
            expected: 1,
            found: 2
        }
    ));

    // non-boolean yield
    let mut b = Region::builder(Tuple::new(scan_schema()));
    let id = b.index_by_name("id").expect("id");
    let region = b.finish(vec![id]);
    let err = plan.select(scan, region).unwrap_err();
    assert!(matches!(err, IrError::TypeMismatch { .. }));
}

#[test]
fn test_project_shape_and_types() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());

    let mut b = Region::builder(Tuple::new(scan_schema()));
    let amount = b.index_by_name("amount").expect("amount");
    let region = b.finish(vec![amount]);

    let project = plan
        .project(
            scan,
            vec!["amount".to_string()],
            vec![ScalarType::Int32],
            region,
        )
        .expect("valid project");

    let result = plan.op(project).result();
    assert_eq!(result.schema.len(), 1);
    assert_eq!(
        result.schema.element(0).map(|e| e.name.as_str()),
        Some("amount")
    );
}

#[test]
fn test_project_yield_count_must_match_output() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());

    let mut b = Region::builder(Tuple::new(scan_schema()));
    let amount = b.index_by_name("amount").expect("amount");
    let region = b.finish(vec![amount]);

    let err = plan
        .project(
            scan,
            vec!["a".to_string(), "b".to_string()],
            vec![ScalarType::Int32, ScalarType::Int32],
            region,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        IrError::RegionShapeMismatch {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn test_project_positional_type_mismatch() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());

    let mut b = Region::builder(Tuple::new(scan_schema()));
    let amount = b.index_by_name("amount").expect("amount");
    let region = b.finish(vec![amount]);

    let err = plan
        .project(
            scan,
            vec!["amount".to_string()],
            vec![ScalarType::Int64],
            region,
        )
        .unwrap_err();
    assert!(matches!(err, IrError::TypeMismatch { .. }));
}

#[test]
fn test_project_names_types_arity() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let mut b = Region::builder(Tuple::new(scan_schema()));
    let amount = b.index_by_name("amount").expect("amount");
    let region = b.finish(vec![amount]);

    let err = plan
        .project(scan, vec!["amount".to_string()], vec![], region)
        .unwrap_err();
    assert!(matches!(err, IrError::ArityMismatch { .. }));
}

#[test]
fn test_aggregate_output_schema_is_int32_per_column() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let agg = plan
        .aggregate(scan, vec!["id".to_string()], vec!["sum".to_string()])
        .expect("valid aggregate");

    let schema = &plan.op(agg).result().schema;
    assert_eq!(schema.len(), 1);
    assert_eq!(schema.element(0).map(|e| e.name.as_str()), Some("id"));
    assert_eq!(schema.element(0).map(|e| e.ty), Some(ScalarType::Int32));
}

#[test]
fn test_aggregate_arity_mismatch() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    let err = plan
        .aggregate(
            scan,
            vec!["id".to_string()],
            vec!["sum".to_string(), "sum".to_string()],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        IrError::ArityMismatch {
            left: 2,
            right: 1,
            ..
        }
    ));
}

#[test]
fn test_aggregate_rejects_unsupported_function() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    // fails at construction, before any lowering is attempted
    let err = plan
        .aggregate(scan, vec!["id".to_string()], vec!["avg".to_string()])
        .unwrap_err();
    match err {
        IrError::UnsupportedAggregate { name } => assert_eq!(name, "avg"),
        other => panic!("expected UnsupportedAggregate, got {other:?}"),
    }
}

#[test]
fn test_root_is_last_appended() {
    let mut plan = RelPlan::new();
    assert_eq!(plan.root(), None);
    let scan = plan.full_table_scan("t", scan_schema());
    assert_eq!(plan.root(), Some(scan));
    let agg = plan
        .aggregate(scan, vec!["id".to_string()], vec!["sum".to_string()])
        .expect("aggregate");
    assert_eq!(plan.root(), Some(agg));
    assert_eq!(plan.len(), 2);
}

#[test]
fn test_plan_serde_round_trip() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", scan_schema());
    plan.select(scan, predicate_over(&scan_schema()))
        .expect("select");

    let json = serde_json::to_string(&plan).expect("serialize");
    let back: RelPlan = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.len(), plan.len());
    assert_eq!(back.op(scan).result(), plan.op(scan).result());
}
