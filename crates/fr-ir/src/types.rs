//! Scalar type system shared by both dialects

use serde::{Deserialize, Serialize};

/// Scalar column types of the relational implementation dialect
///
/// Types are plain values compared structurally: two `Int32`s are the
/// same type wherever they appear. Only `String` carries a parameter
/// (nullability); everything else is a bare tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Exact decimal
    Decimal,
    /// Point in time
    Timestamp,
    /// Character string, nullable or not
    String {
        /// Whether the column may hold NULL
        nullable: bool,
    },
}

impl ScalarType {
    /// Returns true for the integer types
    pub fn is_integer(&self) -> bool {
        matches!(self, ScalarType::Int32 | ScalarType::Int64)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Int32 => write!(f, "int32"),
            ScalarType::Int64 => write!(f, "int64"),
            ScalarType::Decimal => write!(f, "decimal"),
            ScalarType::Timestamp => write!(f, "timestamp"),
            ScalarType::String { nullable: true } => write!(f, "string<nullable>"),
            ScalarType::String { nullable: false } => write!(f, "string"),
        }
    }
}

/// Result type of an expression inside an operator region
///
/// `Boolean` is a pure type tag: it carries no value representation at
/// the IR level and exists so predicates can be told apart from
/// column-valued expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// A column-valued expression of the given scalar type
    Scalar(ScalarType),
    /// A predicate result
    Boolean,
}

impl ValueType {
    /// Returns true if this is the Boolean tag
    pub fn is_boolean(&self) -> bool {
        matches!(self, ValueType::Boolean)
    }

    /// The scalar type, if this is a scalar value
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            ValueType::Scalar(ty) => Some(*ty),
            ValueType::Boolean => None,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Scalar(ty) => write!(f, "{ty}"),
            ValueType::Boolean => write!(f, "bool"),
        }
    }
}
