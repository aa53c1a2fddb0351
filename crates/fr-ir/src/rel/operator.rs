//! Relational operators — an arena-addressed plan of bag-valued nodes

use crate::error::{IrError, IrResult};
use crate::rel::expr::Region;
use crate::schema::{Bag, Schema, SchemaElement};
use crate::types::{ScalarType, ValueType};
use serde::{Deserialize, Serialize};

/// Aggregate functions accepted by [`RelPlan::aggregate`]
///
/// Extending the whitelist is a data change here, not a structural one.
pub const SUPPORTED_AGGREGATES: &[&str] = &["sum"];

/// Handle to an operator inside its plan's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpId(pub(crate) usize);

impl OpId {
    /// Position in the plan's operator arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A relational operator node
///
/// Every variant carries its result [`Bag`]; the output schema is
/// derived (and verified) when the node is constructed through
/// [`RelPlan`], never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelOp {
    /// Full scan of a named table with a declared schema
    ///
    /// The schema is opaque to the scan; nothing binds it to physical
    /// storage at this level.
    FullTableScan {
        /// Table name
        table_name: String,
        /// Declared output bag
        result: Bag,
    },

    /// Keep the input rows for which the predicate region yields true
    Select {
        /// Input operator
        input: OpId,
        /// Predicate over one input tuple; yields one Boolean
        predicate: Region,
        /// Output bag (same schema as the input)
        result: Bag,
    },

    /// Transform every input row into the yielded values
    Project {
        /// Input operator
        input: OpId,
        /// Projection over one input tuple; yields one value per output column
        projection: Region,
        /// Output bag (declared schema)
        result: Bag,
    },

    /// Apply the ith function to the ith named column of the input
    Aggregate {
        /// Input operator
        input: OpId,
        /// Aggregated column names
        col_names: Vec<String>,
        /// Aggregate function per column
        functions: Vec<String>,
        /// Output bag: one Int32 column per aggregated name
        result: Bag,
    },
}

impl RelOp {
    /// The operator's result bag
    pub fn result(&self) -> &Bag {
        match self {
            RelOp::FullTableScan { result, .. } => result,
            RelOp::Select { result, .. } => result,
            RelOp::Project { result, .. } => result,
            RelOp::Aggregate { result, .. } => result,
        }
    }

    /// The operator's input, if it has one
    pub fn input(&self) -> Option<OpId> {
        match self {
            RelOp::FullTableScan { .. } => None,
            RelOp::Select { input, .. } => Some(*input),
            RelOp::Project { input, .. } => Some(*input),
            RelOp::Aggregate { input, .. } => Some(*input),
        }
    }

    /// Stable operator kind name (printed form and error messages)
    pub fn kind(&self) -> &'static str {
        match self {
            RelOp::FullTableScan { .. } => "full_table_scan",
            RelOp::Select { .. } => "select",
            RelOp::Project { .. } => "project",
            RelOp::Aggregate { .. } => "aggregate",
        }
    }
}

/// An append-only arena of relational operators
///
/// Operands always precede their users, so arena order is a valid
/// evaluation order. The plan is rooted at the last operator appended.
/// Construction is the verification boundary: every method checks its
/// operator's contract eagerly and a plan that exists is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelPlan {
    ops: Vec<RelOp>,
}

impl RelPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Operator behind a handle
    pub fn op(&self, id: OpId) -> &RelOp {
        &self.ops[id.0]
    }

    /// All operators with their handles, in arena order
    pub fn ops(&self) -> impl Iterator<Item = (OpId, &RelOp)> {
        self.ops.iter().enumerate().map(|(i, op)| (OpId(i), op))
    }

    /// Number of operators
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the plan has no operators
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The plan's output operator (the last one appended)
    pub fn root(&self) -> Option<OpId> {
        if self.ops.is_empty() {
            None
        } else {
            Some(OpId(self.ops.len() - 1))
        }
    }

    fn push(&mut self, op: RelOp) -> OpId {
        self.ops.push(op);
        OpId(self.ops.len() - 1)
    }

    /// Append a full table scan with the given declared schema
    pub fn full_table_scan(&mut self, table_name: impl Into<String>, schema: Schema) -> OpId {
        self.push(RelOp::FullTableScan {
            table_name: table_name.into(),
            result: Bag::new(schema),
        })
    }

    /// Append a select over `input`
    ///
    /// The predicate region must take one tuple of the input schema and
    /// yield exactly one Boolean. The output schema is the input schema.
    pub fn select(&mut self, input: OpId, predicate: Region) -> IrResult<OpId> {
        let input_schema = self.op(input).result().schema.clone();
        if predicate.param().schema != input_schema {
            return Err(IrError::SchemaMismatch {
                message: format!(
                    "select predicate takes {} but input rows are {}",
                    predicate.param().schema,
                    input_schema
                ),
            });
        }
        let yielded = predicate.yielded_types();
        if yielded.len() != 1 {
            return Err(IrError::RegionShapeMismatch {
                expected: 1,
                found: yielded.len(),
            });
        }
        if !yielded[0].is_boolean() {
            return Err(IrError::TypeMismatch {
                message: format!("select predicate must yield bool, got {}", yielded[0]),
            });
        }
        Ok(self.push(RelOp::Select {
            input,
            predicate,
            result: Bag::new(input_schema),
        }))
    }

    /// Append a project over `input`, declaring the output columns as
    /// (name, type) lists
    pub fn project(
        &mut self,
        input: OpId,
        res_names: Vec<String>,
        res_types: Vec<ScalarType>,
        projection: Region,
    ) -> IrResult<OpId> {
        if res_names.len() != res_types.len() {
            return Err(IrError::ArityMismatch {
                context: "projection names vs types",
                left: res_names.len(),
                right: res_types.len(),
            });
        }
        let elements = res_names
            .into_iter()
            .zip(res_types)
            .map(|(n, t)| SchemaElement::new(n, t))
            .collect();
        self.project_into(input, Bag::new(Schema::new(elements)), projection)
    }

    /// Append a project over `input` with a pre-built result bag
    ///
    /// The projection region must take one tuple of the input schema
    /// and yield one value per output column, positionally typed.
    pub fn project_into(
        &mut self,
        input: OpId,
        result: Bag,
        projection: Region,
    ) -> IrResult<OpId> {
        let input_schema = &self.op(input).result().schema;
        if projection.param().schema != *input_schema {
            return Err(IrError::SchemaMismatch {
                message: format!(
                    "projection takes {} but input rows are {}",
                    projection.param().schema,
                    input_schema
                ),
            });
        }
        let yielded = projection.yielded_types();
        if yielded.len() != result.schema.len() {
            return Err(IrError::RegionShapeMismatch {
                expected: result.schema.len(),
                found: yielded.len(),
            });
        }
        for (i, (value, element)) in yielded.iter().zip(result.schema.elements()).enumerate() {
            if *value != ValueType::Scalar(element.ty) {
                return Err(IrError::TypeMismatch {
                    message: format!(
                        "projection value {i} yields {value} but column '{}' is {}",
                        element.name, element.ty
                    ),
                });
            }
        }
        Ok(self.push(RelOp::Project {
            input,
            projection,
            result,
        }))
    }

    /// Append an aggregate over `input`
    ///
    /// `functions[i]` is applied to the column named `col_names[i]`;
    /// the lists must pair up and every function must be in
    /// [`SUPPORTED_AGGREGATES`]. The output schema has one Int32 column
    /// per aggregated name.
    pub fn aggregate(
        &mut self,
        input: OpId,
        col_names: Vec<String>,
        functions: Vec<String>,
    ) -> IrResult<OpId> {
        if functions.len() != col_names.len() {
            return Err(IrError::ArityMismatch {
                context: "aggregate functions vs column names",
                left: functions.len(),
                right: col_names.len(),
            });
        }
        for f in &functions {
            if !SUPPORTED_AGGREGATES.contains(&f.as_str()) {
                return Err(IrError::UnsupportedAggregate { name: f.clone() });
            }
        }
        let elements = col_names
            .iter()
            .map(|n| SchemaElement::new(n.clone(), ScalarType::Int32))
            .collect();
        Ok(self.push(RelOp::Aggregate {
            input,
            col_names,
            functions,
            result: Bag::new(Schema::new(elements)),
        }))
    }
}

#[cfg(test)]
#[path = "operator_test.rs"]
mod tests;
