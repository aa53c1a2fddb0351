//! Stream operations — an arena-addressed graph of iterator nodes

use crate::error::{IrError, IrResult};
use crate::stream::types::StreamType;
use serde::{Deserialize, Serialize};

/// Handle to an operation inside its graph's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamOpId(pub(crate) usize);

impl StreamOpId {
    /// Position in the graph's operation arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A stream operation node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamOp {
    /// Produce an unspecified sample stream (debugging stub)
    SampleInput {
        /// Result stream type
        result: StreamType,
    },

    /// Produce a fixed, literal stream
    ///
    /// Each inner list is one record; every row must have exactly one
    /// value per field of the element layout. Zero rows is legal.
    ConstantStream {
        /// Literal rows
        rows: Vec<Vec<i64>>,
        /// Result stream type
        result: StreamType,
    },

    /// Pairwise-reduce the input stream via a named merge function
    ///
    /// The result stream holds at most one element and is empty iff the
    /// input is empty. Reduction order is implementation-defined, so
    /// the result is only deterministic for associative functions.
    Reduce {
        /// Input stream
        input: StreamOpId,
        /// Symbol of the merge function, signature `(T, T) -> T`
        func: String,
        /// Result stream type (same element layout as the input)
        result: StreamType,
    },

    /// Drain the input stream; terminal consumer, no result
    Sink {
        /// Input stream
        input: StreamOpId,
    },

    /// Entry-function terminator
    Return,
}

impl StreamOp {
    /// The stream this operation produces, if any
    pub fn result(&self) -> Option<&StreamType> {
        match self {
            StreamOp::SampleInput { result } => Some(result),
            StreamOp::ConstantStream { result, .. } => Some(result),
            StreamOp::Reduce { result, .. } => Some(result),
            StreamOp::Sink { .. } | StreamOp::Return => None,
        }
    }

    /// Stable operation kind name (printed form and error messages)
    pub fn kind(&self) -> &'static str {
        match self {
            StreamOp::SampleInput { .. } => "sample_input",
            StreamOp::ConstantStream { .. } => "constant_stream",
            StreamOp::Reduce { .. } => "reduce",
            StreamOp::Sink { .. } => "sink",
            StreamOp::Return => "return",
        }
    }
}

/// An append-only arena of stream operations
///
/// Like the relational plan, operands precede users and every
/// constructor checks its operation's contract eagerly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamGraph {
    ops: Vec<StreamOp>,
}

impl StreamGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Operation behind a handle
    pub fn op(&self, id: StreamOpId) -> &StreamOp {
        &self.ops[id.0]
    }

    /// All operations with their handles, in arena order
    pub fn ops(&self) -> impl Iterator<Item = (StreamOpId, &StreamOp)> {
        self.ops
            .iter()
            .enumerate()
            .map(|(i, op)| (StreamOpId(i), op))
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the graph has no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn push(&mut self, op: StreamOp) -> StreamOpId {
        self.ops.push(op);
        StreamOpId(self.ops.len() - 1)
    }

    fn input_stream(&self, input: StreamOpId, consumer: &str) -> IrResult<&StreamType> {
        self.op(input)
            .result()
            .ok_or_else(|| IrError::TypeMismatch {
                message: format!(
                    "{consumer} input must produce a stream, but '{}' produces none",
                    self.op(input).kind()
                ),
            })
    }

    /// Append a sample-input stub
    pub fn sample_input(&mut self, result: StreamType) -> StreamOpId {
        self.push(StreamOp::SampleInput { result })
    }

    /// Append a constant stream, checking every row against the layout
    pub fn constant_stream(
        &mut self,
        rows: Vec<Vec<i64>>,
        result: StreamType,
    ) -> IrResult<StreamOpId> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != result.elem.len() {
                return Err(IrError::SchemaMismatch {
                    message: format!(
                        "constant stream row {i} has {} value(s) but element layout {} expects {}",
                        row.len(),
                        result.elem,
                        result.elem.len()
                    ),
                });
            }
        }
        Ok(self.push(StreamOp::ConstantStream { rows, result }))
    }

    /// Append a reduce over `input` via the named merge function
    pub fn reduce(
        &mut self,
        input: StreamOpId,
        func: impl Into<String>,
        result: StreamType,
    ) -> IrResult<StreamOpId> {
        let input_ty = self.input_stream(input, "reduce")?;
        if *input_ty != result {
            return Err(IrError::TypeMismatch {
                message: format!(
                    "reduce must preserve its element type: input is {input_ty}, result declared {result}"
                ),
            });
        }
        Ok(self.push(StreamOp::Reduce {
            input,
            func: func.into(),
            result,
        }))
    }

    /// Append a sink draining `input`
    pub fn sink(&mut self, input: StreamOpId) -> IrResult<StreamOpId> {
        self.input_stream(input, "sink")?;
        Ok(self.push(StreamOp::Sink { input }))
    }

    /// Append the entry-function terminator
    pub fn ret(&mut self) -> StreamOpId {
        self.push(StreamOp::Return)
    }
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod tests;
