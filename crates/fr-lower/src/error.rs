//! Error types for fr-lower

use fr_ir::{IrError, RecordType, ScalarType};
use thiserror::Error;

/// Lowering error type
///
/// Lowering is all-or-nothing: any of these aborts the containing
/// program's lowering with no partial output. Codes use the `LW`
/// prefix; IR construction errors surfaced mid-lowering keep their
/// `IR` codes and are wrapped by `LW004`.
#[derive(Error, Debug)]
pub enum LowerError {
    /// LW001: Relational scalar type with no iterator-dialect counterpart
    #[error("[LW001] No iterator-dialect conversion for relational type {ty}")]
    UnsupportedTypeConversion { ty: ScalarType },

    /// LW002: Relational operator with no rewrite rule
    #[error("[LW002] No rewrite rule for relational operator '{kind}'")]
    UnsupportedOperator { kind: &'static str },

    /// LW003: Aggregate layout not covered by the fixed struct-sum reducer
    #[error("[LW003] Record layout {layout} is not covered by the struct-sum reducer")]
    UnsupportedReducerLayout { layout: RecordType },

    /// LW004: IR construction failed while building the output module
    #[error("[LW004] IR construction failed during lowering: {0}")]
    Ir(#[from] IrError),

    /// LW005: Nothing to lower
    #[error("[LW005] Cannot lower an empty plan")]
    EmptyPlan,
}

/// Result type alias for LowerError
pub type LowerResult<T> = Result<T, LowerError>;
