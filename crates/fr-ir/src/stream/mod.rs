//! Streaming iterator dialect — the lowering target
//!
//! Models a pull-based execution contract: finite, one-pass streams of
//! flat typed records, consumed by exactly one sink. This is the shape
//! an external execution engine runs; nothing here executes.

pub mod func;
pub mod ops;
pub mod types;
