//! fr-ir: IR dialects for Freshet
//!
//! Two dialects over one schema model: the relational implementation
//! dialect (operators over bags, expression regions over tuples) and
//! the streaming iterator dialect (typed record streams, reduce, sink).
//! Plans and modules are immutable once constructed; all verification
//! happens eagerly at construction time.

pub mod error;
pub mod print;
pub mod rel;
pub mod schema;
pub mod stream;
pub mod types;

pub use error::{IrError, IrResult};
pub use print::{print_module, print_plan};
pub use rel::expr::{ArithOp, CmpOp, Expr, ExprId, LiteralValue, Region, RegionBuilder};
pub use rel::operator::{OpId, RelOp, RelPlan, SUPPORTED_AGGREGATES};
pub use schema::{Bag, Schema, SchemaElement, Tuple};
pub use stream::func::{EntryFunc, Module, RecordInstr, ReducerBuilder, ReducerFunc, ValueId};
pub use stream::ops::{StreamGraph, StreamOp, StreamOpId};
pub use stream::types::{FieldType, RecordType, StreamType};
pub use types::{ScalarType, ValueType};
