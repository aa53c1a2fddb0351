use super::*;
use crate::stream::types::{FieldType, RecordType};

fn i32_stream() -> StreamType {
    StreamType::new(RecordType::new(vec![FieldType::Int32]))
}

#[test]
fn test_constant_stream_checks_row_arity() {
    let mut g = StreamGraph::new();
    let ok = g.constant_stream(vec![vec![0], vec![1]], i32_stream());
    assert!(ok.is_ok());

    let err = g
        .constant_stream(vec![vec![0], vec![1, 2]], i32_stream())
        .unwrap_err();
    assert!(matches!(err, IrError::SchemaMismatch { .. }));
}

#[test]
fn test_constant_stream_zero_rows_is_legal() {
    let mut g = StreamGraph::new();
    let id = g
        .constant_stream(vec![], i32_stream())
        .expect("empty stream");
    match g.op(id) {
        StreamOp::ConstantStream { rows, .. } => assert!(rows.is_empty()),
        other => panic!("expected ConstantStream, got {other:?}"),
    }
}

#[test]
fn test_reduce_preserves_element_type() {
    let mut g = StreamGraph::new();
    let input = g
        .constant_stream(vec![vec![0]], i32_stream())
        .expect("input");
    let reduce = g
        .reduce(input, "sum_struct", i32_stream())
        .expect("same element type");
    assert_eq!(g.op(reduce).result(), Some(&i32_stream()));

    let widened = StreamType::new(RecordType::new(vec![FieldType::Int64]));
    let err = g.reduce(input, "sum_struct", widened).unwrap_err();
    assert!(matches!(err, IrError::TypeMismatch { .. }));
}

#[test]
fn test_reduce_over_empty_stream_is_well_formed() {
    // the emptiness law is a runtime property; the IR only requires the
    // shapes to line up, rows or no rows
    let mut g = StreamGraph::new();
    let empty = g.constant_stream(vec![], i32_stream()).expect("empty");
    assert!(g.reduce(empty, "sum_struct", i32_stream()).is_ok());
}

#[test]
fn test_sink_requires_stream_input() {
    let mut g = StreamGraph::new();
    let input = g
        .constant_stream(vec![vec![3]], i32_stream())
        .expect("input");
    let sink = g.sink(input).expect("sink over stream");
    assert_eq!(g.op(sink).result(), None);
    assert_eq!(g.op(sink).kind(), "sink");

    // sink produces nothing, so it cannot feed another consumer
    let err = g.sink(sink).unwrap_err();
    assert!(matches!(err, IrError::TypeMismatch { .. }));
}

#[test]
fn test_arena_order_and_handles() {
    let mut g = StreamGraph::new();
    let a = g.sample_input(i32_stream());
    let b = g
        .reduce(a, "sum_struct", i32_stream())
        .expect("reduce over sample");
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(g.len(), 2);
    let kinds: Vec<_> = g.ops().map(|(_, op)| op.kind()).collect();
    assert_eq!(kinds, vec!["sample_input", "reduce"]);
}
