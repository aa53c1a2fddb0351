use super::*;
use fr_ir::{
    CmpOp, FieldType, LiteralValue, RecordType, Region, ScalarType, Schema, SchemaElement,
    StreamOp, StreamType, Tuple,
};

fn id_schema() -> Schema {
    Schema::new(vec![SchemaElement::new("id", ScalarType::Int32)])
}

fn rewrite_all(plan: &RelPlan) -> LowerResult<(StreamGraph, HashMap<OpId, StreamOpId>)> {
    let mut graph = StreamGraph::new();
    let subst = GreedyRewriter::with_default_rules().rewrite_plan(plan, &mut graph)?;
    Ok((graph, subst))
}

#[test]
fn test_scan_becomes_placeholder_constant_stream() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", id_schema());
    let (graph, subst) = rewrite_all(&plan).expect("scan lowers");

    let lowered = subst[&scan];
    match graph.op(lowered) {
        StreamOp::ConstantStream { rows, result } => {
            assert_eq!(rows, &vec![vec![0], vec![1], vec![2], vec![3]]);
            assert_eq!(
                result,
                &StreamType::new(RecordType::new(vec![FieldType::Int32]))
            );
        }
        other => panic!("expected ConstantStream, got {other:?}"),
    }
}

#[test]
fn test_wide_scan_rows_repeat_index_across_layout() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan(
        "t",
        Schema::new(vec![
            SchemaElement::new("a", ScalarType::Int32),
            SchemaElement::new("b", ScalarType::Int32),
        ]),
    );
    let (graph, subst) = rewrite_all(&plan).expect("scan lowers");
    match graph.op(subst[&scan]) {
        StreamOp::ConstantStream { rows, .. } => {
            assert_eq!(
                rows,
                &vec![vec![0, 0], vec![1, 1], vec![2, 2], vec![3, 3]]
            );
        }
        other => panic!("expected ConstantStream, got {other:?}"),
    }
}

#[test]
fn test_aggregate_becomes_reduce_over_lowered_input() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", id_schema());
    let agg = plan
        .aggregate(scan, vec!["id".to_string()], vec!["sum".to_string()])
        .expect("aggregate");

    let (graph, subst) = rewrite_all(&plan).expect("plan lowers");
    match graph.op(subst[&agg]) {
        StreamOp::Reduce {
            input,
            func,
            result,
        } => {
            assert_eq!(*input, subst[&scan]);
            assert_eq!(func, SUM_STRUCT);
            assert_eq!(result.elem, sum_reducer_layout());
        }
        other => panic!("expected Reduce, got {other:?}"),
    }
}

#[test]
fn test_select_has_no_rewrite_rule() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan("t", id_schema());
    let mut b = Region::builder(Tuple::new(id_schema()));
    let id = b.index_by_name("id").expect("id");
    let zero = b
        .literal(LiteralValue::Integer(0), ScalarType::Int32)
        .expect("literal");
    let flag = b.compare(id, zero, CmpOp::Gt).expect("compare");
    plan.select(scan, b.finish(vec![flag])).expect("select");

    match rewrite_all(&plan).unwrap_err() {
        LowerError::UnsupportedOperator { kind } => assert_eq!(kind, "select"),
        other => panic!("expected UnsupportedOperator, got {other:?}"),
    }
}

#[test]
fn test_multi_column_aggregate_is_rejected_not_shared() {
    let mut plan = RelPlan::new();
    let scan = plan.full_table_scan(
        "t",
        Schema::new(vec![
            SchemaElement::new("a", ScalarType::Int32),
            SchemaElement::new("b", ScalarType::Int32),
        ]),
    );
    plan.aggregate(
        scan,
        vec!["a".to_string(), "b".to_string()],
        vec!["sum".to_string(), "sum".to_string()],
    )
    .expect("construction accepts consistent sum lists");

    match rewrite_all(&plan).unwrap_err() {
        LowerError::UnsupportedReducerLayout { layout } => {
            assert_eq!(layout.len(), 2);
        }
        other => panic!("expected UnsupportedReducerLayout, got {other:?}"),
    }
}

#[test]
fn test_scan_of_unconvertible_schema_fails() {
    let mut plan = RelPlan::new();
    plan.full_table_scan(
        "t",
        Schema::new(vec![SchemaElement::new("ts", ScalarType::Timestamp)]),
    );
    assert!(matches!(
        rewrite_all(&plan).unwrap_err(),
        LowerError::UnsupportedTypeConversion {
            ty: ScalarType::Timestamp
        }
    ));
}

#[test]
fn test_rewrite_covers_every_operator_once() {
    let mut plan = RelPlan::new();
    let s1 = plan.full_table_scan("t", id_schema());
    let s2 = plan.full_table_scan("u", id_schema());
    let agg = plan
        .aggregate(s2, vec!["id".to_string()], vec!["sum".to_string()])
        .expect("aggregate");

    let (graph, subst) = rewrite_all(&plan).expect("lowers");
    assert_eq!(subst.len(), 3);
    assert_eq!(graph.len(), 3);
    for id in [s1, s2, agg] {
        assert!(subst.contains_key(&id));
    }
}
