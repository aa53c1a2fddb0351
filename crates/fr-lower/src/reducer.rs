//! Synthesis of the struct-sum merge function

use fr_ir::{FieldType, IrResult, RecordType, ReducerFunc};

/// Symbol of the synthesized struct-sum merge function
pub const SUM_STRUCT: &str = "sum_struct";

/// The single-`i32` record layout the struct-sum reducer covers
///
/// Aggregates whose converted layout differs need a reducer of their
/// own; they must not share this one.
pub(crate) fn sum_reducer_layout() -> RecordType {
    RecordType::new(vec![FieldType::Int32])
}

/// Synthesize `@sum_struct: (record<i32>, record<i32>) -> record<i32>`
///
/// Extracts field 0 of both parameter records, adds them, and returns
/// the first record with the sum written back into field 0. Synthesized
/// once per lowered program and appended to the module's function
/// table whether or not any reduce ends up invoking it.
pub fn synthesize_sum_reducer() -> IrResult<ReducerFunc> {
    let mut b = ReducerFunc::builder(SUM_STRUCT, sum_reducer_layout());
    let (lhs, rhs) = (b.lhs(), b.rhs());
    let left = b.extract_value(lhs, 0)?;
    let right = b.extract_value(rhs, 0)?;
    let sum = b.add(left, right)?;
    let out = b.insert_value(lhs, sum, 0)?;
    b.ret(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr_ir::RecordInstr;

    #[test]
    fn test_synthesized_reducer_shape() {
        let f = synthesize_sum_reducer().expect("synthesis succeeds");
        assert_eq!(f.name(), SUM_STRUCT);
        assert_eq!(f.layout(), &sum_reducer_layout());

        // extract, extract, add, insert, return
        assert_eq!(f.body().len(), 5);
        assert!(matches!(f.body()[0], RecordInstr::ExtractValue { index: 0, .. }));
        assert!(matches!(f.body()[1], RecordInstr::ExtractValue { index: 0, .. }));
        assert!(matches!(f.body()[2], RecordInstr::Add { .. }));
        assert!(matches!(f.body()[3], RecordInstr::InsertValue { index: 0, .. }));
        assert!(matches!(f.body()[4], RecordInstr::Return { .. }));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let a = synthesize_sum_reducer().expect("first");
        let b = synthesize_sum_reducer().expect("second");
        assert_eq!(a.name(), b.name());
        assert_eq!(a.layout(), b.layout());
        assert_eq!(a.body().len(), b.body().len());
    }
}
