//! Record and stream types of the iterator dialect

use serde::{Deserialize, Serialize};

/// Type of a single record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Int32 => write!(f, "i32"),
            FieldType::Int64 => write!(f, "i64"),
        }
    }
}

/// Flat, fixed-layout record type, the element shape of a stream
///
/// Fields are addressed by position only; records never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Field types, in layout order
    pub fields: Vec<FieldType>,
}

impl RecordType {
    /// Create a record type from its field list
    pub fn new(fields: Vec<FieldType>) -> Self {
        Self { fields }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record<")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        write!(f, ">")
    }
}

/// A lazy, finite, one-pass sequence of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamType {
    /// Element record layout
    pub elem: RecordType,
}

impl StreamType {
    /// Create a stream type over the given element layout
    pub fn new(elem: RecordType) -> Self {
        Self { elem }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream<{}>", self.elem)
    }
}
