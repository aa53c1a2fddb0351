//! Relational implementation dialect — operators over bags, expressions over tuples
//!
//! Operators (scan, select, project, aggregate) consume and produce
//! [`Bag`](crate::schema::Bag)s; the row-level behavior of select and
//! project is spelled out by an expression region evaluated against a
//! single [`Tuple`](crate::schema::Tuple). `IndexByName` and the
//! region's yield bridge between the two levels.

pub mod expr;
pub mod operator;
