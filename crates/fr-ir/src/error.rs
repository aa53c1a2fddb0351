//! Error types for fr-ir

use thiserror::Error;

/// IR construction and verification error type
///
/// Every variant is a fail-fast, construction-time failure: a plan or
/// module that exists has already passed these checks. Codes use the
/// `IR` prefix to keep them distinct from lowering errors (`LW` codes
/// in fr-lower).
#[derive(Error, Debug)]
pub enum IrError {
    /// IR001: A value's declared schema disagrees with its structural shape
    #[error("[IR001] Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// IR002: Mismatched list lengths where a 1:1 correspondence is required
    #[error("[IR002] Arity mismatch in {context}: {left} vs {right}")]
    ArityMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    /// IR003: Aggregate function outside the supported whitelist
    #[error("[IR003] Aggregate function '{name}' is not supported")]
    UnsupportedAggregate { name: String },

    /// IR004: A region yields the wrong number of values for its operator
    #[error("[IR004] Region yields {found} value(s), expected {expected}")]
    RegionShapeMismatch { expected: usize, found: usize },

    /// IR005: An operand or yielded value has the wrong type
    #[error("[IR005] Type mismatch: {message}")]
    TypeMismatch { message: String },

    /// IR006: A function reference does not resolve within the module
    #[error("[IR006] Unresolved function reference '@{name}'")]
    UnresolvedFunction { name: String },

    /// IR007: A module violates the iterator execution contract
    #[error("[IR007] Malformed module: {message}")]
    MalformedModule { message: String },
}

/// Result type alias for IrError
pub type IrResult<T> = Result<T, IrError>;
