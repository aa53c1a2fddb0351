//! Expression regions — row-level predicates and projections

use crate::error::{IrError, IrResult};
use crate::schema::Tuple;
use crate::types::{ScalarType, ValueType};
use serde::{Deserialize, Serialize};

/// Handle to an expression inside its region's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprId(pub(crate) usize);

impl ExprId {
    /// Position in the region's expression arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A literal constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// Integer literal
    Integer(i64),
    /// String literal
    String(String),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Integer(v) => write!(f, "{v}"),
            LiteralValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Arithmetic operator of a binary expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
        }
    }
}

/// Comparator of a compare expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    /// Equality (=)
    Eq,
    /// Inequality (<>)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpOp::Eq => write!(f, "="),
            CmpOp::NotEq => write!(f, "<>"),
            CmpOp::Lt => write!(f, "<"),
            CmpOp::LtEq => write!(f, "<="),
            CmpOp::Gt => write!(f, ">"),
            CmpOp::GtEq => write!(f, ">="),
        }
    }
}

/// An expression node, evaluated against the region's tuple parameter
///
/// `IndexByName` carries both the source column name and the positional
/// index it resolved to at construction time; later stages consume only
/// the index and never re-resolve by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Value of the named field of the tuple parameter
    IndexByName {
        /// Column name as written in the query
        col_name: String,
        /// Resolved position in the tuple schema
        field_index: usize,
        /// Field type at that position
        ty: ScalarType,
    },

    /// Typed constant
    Literal {
        /// Constant value
        value: LiteralValue,
        /// Declared type
        ty: ScalarType,
    },

    /// `lhs op rhs` over two same-typed scalars
    BinOp {
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
        /// Operator
        op: ArithOp,
        /// Result type (same as the operands)
        ty: ScalarType,
    },

    /// `lhs cmp rhs`, producing a Boolean
    Compare {
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
        /// Comparator
        cmp: CmpOp,
    },

    /// Logical conjunction of two Booleans
    And {
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
    },
}

impl Expr {
    /// Result type of this expression
    pub fn value_type(&self) -> ValueType {
        match self {
            Expr::IndexByName { ty, .. } => ValueType::Scalar(*ty),
            Expr::Literal { ty, .. } => ValueType::Scalar(*ty),
            Expr::BinOp { ty, .. } => ValueType::Scalar(*ty),
            Expr::Compare { .. } => ValueType::Boolean,
            Expr::And { .. } => ValueType::Boolean,
        }
    }
}

/// A single-block expression region owned by a select or project operator
///
/// A region has exactly one entry parameter (the tuple) and exactly one
/// terminator (the yielded value list) by construction. Whether the
/// yielded arity and types fit is the owning operator's contract,
/// checked when the operator is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    param: Tuple,
    exprs: Vec<Expr>,
    yielded: Vec<ExprId>,
}

impl Region {
    /// Start building a region over the given tuple parameter
    pub fn builder(param: Tuple) -> RegionBuilder {
        RegionBuilder {
            param,
            exprs: Vec::new(),
        }
    }

    /// The region's tuple parameter
    pub fn param(&self) -> &Tuple {
        &self.param
    }

    /// All expressions, in construction order
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// Expression behind a handle
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0]
    }

    /// The terminator's operand list
    pub fn yielded(&self) -> &[ExprId] {
        &self.yielded
    }

    /// Result types of the yielded values, in order
    pub fn yielded_types(&self) -> Vec<ValueType> {
        self.yielded
            .iter()
            .map(|id| self.exprs[id.0].value_type())
            .collect()
    }
}

/// Builds a region one expression at a time, type-checking each push
pub struct RegionBuilder {
    param: Tuple,
    exprs: Vec<Expr>,
}

impl RegionBuilder {
    fn push(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr);
        ExprId(self.exprs.len() - 1)
    }

    fn value_type(&self, id: ExprId) -> ValueType {
        self.exprs[id.0].value_type()
    }

    fn scalar_operand(&self, id: ExprId, context: &str) -> IrResult<ScalarType> {
        self.value_type(id)
            .as_scalar()
            .ok_or_else(|| IrError::TypeMismatch {
                message: format!("{context} operand must be a scalar, got bool"),
            })
    }

    /// Index the tuple parameter by field name
    ///
    /// The name is resolved to a positional index here, once; an absent
    /// name is a construction-time failure.
    pub fn index_by_name(&mut self, name: &str) -> IrResult<ExprId> {
        let field_index =
            self.param
                .schema
                .field_index(name)
                .ok_or_else(|| IrError::SchemaMismatch {
                    message: format!(
                        "no field '{}' in tuple schema {}",
                        name, self.param.schema
                    ),
                })?;
        let ty = self.param.schema.elements()[field_index].ty;
        Ok(self.push(Expr::IndexByName {
            col_name: name.to_string(),
            field_index,
            ty,
        }))
    }

    /// Add a typed literal
    pub fn literal(&mut self, value: LiteralValue, ty: ScalarType) -> IrResult<ExprId> {
        let fits = match (&value, ty) {
            (LiteralValue::Integer(_), t) => !matches!(t, ScalarType::String { .. }),
            (LiteralValue::String(_), ScalarType::String { .. }) => true,
            (LiteralValue::String(_), _) => false,
        };
        if !fits {
            return Err(IrError::TypeMismatch {
                message: format!("literal {value} does not fit type {ty}"),
            });
        }
        Ok(self.push(Expr::Literal { value, ty }))
    }

    /// Add `lhs op rhs`; both operands must be scalars of the same type
    pub fn bin_op(&mut self, lhs: ExprId, rhs: ExprId, op: ArithOp) -> IrResult<ExprId> {
        let lt = self.scalar_operand(lhs, "bin_op")?;
        let rt = self.scalar_operand(rhs, "bin_op")?;
        if lt != rt {
            return Err(IrError::TypeMismatch {
                message: format!("bin_op operands disagree: {lt} vs {rt}"),
            });
        }
        Ok(self.push(Expr::BinOp {
            lhs,
            rhs,
            op,
            ty: lt,
        }))
    }

    /// Add `lhs cmp rhs`; both operands must be scalars of the same type
    pub fn compare(&mut self, lhs: ExprId, rhs: ExprId, cmp: CmpOp) -> IrResult<ExprId> {
        let lt = self.scalar_operand(lhs, "compare")?;
        let rt = self.scalar_operand(rhs, "compare")?;
        if lt != rt {
            return Err(IrError::TypeMismatch {
                message: format!("compare operands disagree: {lt} vs {rt}"),
            });
        }
        Ok(self.push(Expr::Compare { lhs, rhs, cmp }))
    }

    /// Add the conjunction of two Boolean operands
    pub fn and(&mut self, lhs: ExprId, rhs: ExprId) -> IrResult<ExprId> {
        for id in [lhs, rhs] {
            if !self.value_type(id).is_boolean() {
                return Err(IrError::TypeMismatch {
                    message: format!(
                        "and operand must be bool, got {}",
                        self.value_type(id)
                    ),
                });
            }
        }
        Ok(self.push(Expr::And { lhs, rhs }))
    }

    /// Terminate the region, yielding the given values to the owner
    pub fn finish(self, yielded: Vec<ExprId>) -> Region {
        Region {
            param: self.param,
            exprs: self.exprs,
            yielded,
        }
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
