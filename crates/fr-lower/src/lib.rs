//! fr-lower: relational-to-iterator lowering for Freshet
//!
//! Rewrites a relational implementation plan ([`fr_ir::RelPlan`]) into
//! a streaming iterator module ([`fr_ir::Module`]): scans become
//! constant placeholder streams, sum aggregates become reduces over a
//! synthesized merge function, and the result is wrapped in a
//! parameterless entry function terminated by a sink. Lowering is
//! all-or-nothing: a plan either lowers completely or fails with an
//! error naming the offending construct.

pub(crate) mod convert;
pub(crate) mod driver;
pub(crate) mod error;
pub(crate) mod reducer;
pub(crate) mod rules;

pub use convert::{convert_bag, convert_scalar};
pub use driver::{lower_plan, ENTRY_SYMBOL};
pub use error::{LowerError, LowerResult};
pub use reducer::{synthesize_sum_reducer, SUM_STRUCT};
