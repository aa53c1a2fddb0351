//! Functions and modules — the unit a lowering run produces

use crate::error::{IrError, IrResult};
use crate::stream::ops::{StreamGraph, StreamOp};
use crate::stream::types::{FieldType, RecordType};
use serde::{Deserialize, Serialize};

/// Handle to an SSA value inside a reducer body
///
/// Values `0..2` are the two record parameters; each instruction with a
/// result binds the next id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId(pub(crate) usize);

impl ValueId {
    /// Numeric id, as printed
    pub fn index(self) -> usize {
        self.0
    }
}

/// One instruction of a reducer body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecordInstr {
    /// Read field `index` out of a record value
    ExtractValue {
        /// Source record
        src: ValueId,
        /// Field position
        index: usize,
    },
    /// Integer addition of two field values
    Add {
        /// Left operand
        lhs: ValueId,
        /// Right operand
        rhs: ValueId,
    },
    /// Write a field value into position `index` of a record, yielding
    /// the updated record
    InsertValue {
        /// Record being updated
        dst: ValueId,
        /// Field value to insert
        value: ValueId,
        /// Field position
        index: usize,
    },
    /// Terminator: return a record value
    Return {
        /// Returned record
        value: ValueId,
    },
}

/// What an SSA value holds while a reducer body is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Record,
    Field(FieldType),
}

/// A synthesized merge function with signature `(T, T) -> T`
///
/// `T` is the record layout; the body is a straight-line SSA
/// instruction list over the two parameter records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducerFunc {
    name: String,
    layout: RecordType,
    body: Vec<RecordInstr>,
}

impl ReducerFunc {
    /// Start building a reducer over the given record layout
    pub fn builder(name: impl Into<String>, layout: RecordType) -> ReducerBuilder {
        ReducerBuilder {
            name: name.into(),
            kinds: vec![ValueKind::Record, ValueKind::Record],
            layout,
            body: Vec::new(),
        }
    }

    /// Function symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter/result record layout
    pub fn layout(&self) -> &RecordType {
        &self.layout
    }

    /// Body instructions, in order (ends with the return)
    pub fn body(&self) -> &[RecordInstr] {
        &self.body
    }
}

/// Builds a reducer body one instruction at a time, type-checking each
pub struct ReducerBuilder {
    name: String,
    kinds: Vec<ValueKind>,
    layout: RecordType,
    body: Vec<RecordInstr>,
}

impl ReducerBuilder {
    /// The first parameter record
    pub fn lhs(&self) -> ValueId {
        ValueId(0)
    }

    /// The second parameter record
    pub fn rhs(&self) -> ValueId {
        ValueId(1)
    }

    fn bind(&mut self, instr: RecordInstr, kind: ValueKind) -> ValueId {
        self.body.push(instr);
        self.kinds.push(kind);
        ValueId(self.kinds.len() - 1)
    }

    fn field_at(&self, index: usize) -> IrResult<FieldType> {
        self.layout
            .fields
            .get(index)
            .copied()
            .ok_or_else(|| IrError::SchemaMismatch {
                message: format!(
                    "field position {index} out of range for layout {}",
                    self.layout
                ),
            })
    }

    fn record_operand(&self, id: ValueId, context: &str) -> IrResult<()> {
        match self.kinds[id.0] {
            ValueKind::Record => Ok(()),
            ValueKind::Field(ty) => Err(IrError::TypeMismatch {
                message: format!("{context} operand %{} must be a record, got {ty}", id.0),
            }),
        }
    }

    fn field_operand(&self, id: ValueId, context: &str) -> IrResult<FieldType> {
        match self.kinds[id.0] {
            ValueKind::Field(ty) => Ok(ty),
            ValueKind::Record => Err(IrError::TypeMismatch {
                message: format!("{context} operand %{} must be a field value, got a record", id.0),
            }),
        }
    }

    /// Read field `index` of a record value
    pub fn extract_value(&mut self, src: ValueId, index: usize) -> IrResult<ValueId> {
        self.record_operand(src, "extract_value")?;
        let ty = self.field_at(index)?;
        Ok(self.bind(RecordInstr::ExtractValue { src, index }, ValueKind::Field(ty)))
    }

    /// Add two field values of the same type
    pub fn add(&mut self, lhs: ValueId, rhs: ValueId) -> IrResult<ValueId> {
        let lt = self.field_operand(lhs, "add")?;
        let rt = self.field_operand(rhs, "add")?;
        if lt != rt {
            return Err(IrError::TypeMismatch {
                message: format!("add operands disagree: {lt} vs {rt}"),
            });
        }
        Ok(self.bind(RecordInstr::Add { lhs, rhs }, ValueKind::Field(lt)))
    }

    /// Insert a field value into position `index` of a record, yielding
    /// the updated record
    pub fn insert_value(&mut self, dst: ValueId, value: ValueId, index: usize) -> IrResult<ValueId> {
        self.record_operand(dst, "insert_value")?;
        let expected = self.field_at(index)?;
        let got = self.field_operand(value, "insert_value")?;
        if got != expected {
            return Err(IrError::TypeMismatch {
                message: format!(
                    "insert_value at position {index} expects {expected}, got {got}"
                ),
            });
        }
        Ok(self.bind(RecordInstr::InsertValue { dst, value, index }, ValueKind::Record))
    }

    /// Terminate the body, returning a record value
    pub fn ret(mut self, value: ValueId) -> IrResult<ReducerFunc> {
        self.record_operand(value, "return")?;
        self.body.push(RecordInstr::Return { value });
        Ok(ReducerFunc {
            name: self.name,
            layout: self.layout,
            body: self.body,
        })
    }
}

/// The parameterless entry function wrapping a lowered program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFunc {
    name: String,
    body: StreamGraph,
}

impl EntryFunc {
    /// Wrap a stream graph as the named entry function
    pub fn new(name: impl Into<String>, body: StreamGraph) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Function symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The function body
    pub fn body(&self) -> &StreamGraph {
        &self.body
    }
}

/// A lowered program: one entry function plus the reducer function table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    entry: EntryFunc,
    reducers: Vec<ReducerFunc>,
}

impl Module {
    /// Assemble a module from its entry function and reducer table
    pub fn new(entry: EntryFunc, reducers: Vec<ReducerFunc>) -> Self {
        Self { entry, reducers }
    }

    /// The entry function
    pub fn entry(&self) -> &EntryFunc {
        &self.entry
    }

    /// All reducer functions, in table order
    pub fn reducers(&self) -> &[ReducerFunc] {
        &self.reducers
    }

    /// Reducer with the given symbol
    pub fn reducer(&self, name: &str) -> Option<&ReducerFunc> {
        self.reducers.iter().find(|f| f.name == name)
    }

    /// Check the execution-engine contract
    ///
    /// A well-formed module has exactly one sink, an entry body that
    /// terminates in a return, and a resolvable `(T, T) -> T` merge
    /// function for every reduce.
    pub fn verify(&self) -> IrResult<()> {
        let body = self.entry.body();
        if body.is_empty() {
            return Err(IrError::MalformedModule {
                message: "entry function body is empty".to_string(),
            });
        }

        let sinks = body
            .ops()
            .filter(|(_, op)| matches!(op, StreamOp::Sink { .. }))
            .count();
        if sinks != 1 {
            return Err(IrError::MalformedModule {
                message: format!("expected exactly one sink, found {sinks}"),
            });
        }

        let mut returns = 0usize;
        let mut last_is_return = false;
        for (id, op) in body.ops() {
            if matches!(op, StreamOp::Return) {
                returns += 1;
                last_is_return = id.index() == body.len() - 1;
            }
        }
        if returns != 1 || !last_is_return {
            return Err(IrError::MalformedModule {
                message: "entry function must end in a single return".to_string(),
            });
        }

        for (_, op) in body.ops() {
            if let StreamOp::Reduce { func, result, .. } = op {
                let reducer =
                    self.reducer(func)
                        .ok_or_else(|| IrError::UnresolvedFunction {
                            name: func.clone(),
                        })?;
                if *reducer.layout() != result.elem {
                    return Err(IrError::TypeMismatch {
                        message: format!(
                            "reduce over {} references '@{}' with layout {}",
                            result.elem,
                            func,
                            reducer.layout()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "func_test.rs"]
mod tests;
