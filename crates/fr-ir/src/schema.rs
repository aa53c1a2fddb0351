//! Row schemas — ordered (name, type) pairs shared by Bag and Tuple

use crate::error::{IrError, IrResult};
use crate::types::ScalarType;
use serde::{Deserialize, Serialize};

/// A single named, typed field of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: ScalarType,
}

impl SchemaElement {
    /// Create a schema element
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl std::fmt::Display for SchemaElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Ordered sequence of schema elements
///
/// Position is the addressing key for physical layout. Field names need
/// not be unique; name lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    elements: Vec<SchemaElement>,
}

impl Schema {
    /// Create an empty schema
    pub fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Create a schema from a list of elements
    pub fn new(elements: Vec<SchemaElement>) -> Self {
        Self { elements }
    }

    /// Create a schema by zipping names with types
    pub fn of(names: &[&str], types: &[ScalarType]) -> IrResult<Self> {
        if names.len() != types.len() {
            return Err(IrError::ArityMismatch {
                context: "schema names vs types",
                left: names.len(),
                right: types.len(),
            });
        }
        Ok(Self {
            elements: names
                .iter()
                .zip(types.iter())
                .map(|(n, t)| SchemaElement::new(*n, *t))
                .collect(),
        })
    }

    /// Position of the first field with the given name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&SchemaElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Field at the given position
    pub fn element(&self, index: usize) -> Option<&SchemaElement> {
        self.elements.get(index)
    }

    /// All fields, in order
    pub fn elements(&self) -> &[SchemaElement] {
        &self.elements
    }

    /// New schema keeping only the given positions, in the given order
    pub fn project(&self, indices: &[usize]) -> IrResult<Schema> {
        let mut elements = Vec::with_capacity(indices.len());
        for &i in indices {
            match self.elements.get(i) {
                Some(e) => elements.push(e.clone()),
                None => {
                    return Err(IrError::SchemaMismatch {
                        message: format!(
                            "projection index {} out of range for schema {} with {} field(s)",
                            i,
                            self,
                            self.elements.len()
                        ),
                    })
                }
            }
        }
        Ok(Schema { elements })
    }

    /// New schema with `other`'s fields appended after this schema's
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut elements = self.elements.clone();
        elements.extend(other.elements.iter().cloned());
        Schema { elements }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

/// Relational operator result type: an unordered multiset of rows
///
/// A bag carries only the row shape, never data; operators describe
/// collections, they do not hold them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    /// Row schema
    pub schema: Schema,
}

impl Bag {
    /// Create a bag of the given row schema
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl std::fmt::Display for Bag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bag<{}>", self.schema)
    }
}

/// A single row value flowing inside a predicate/projection region
///
/// Shares the schema representation with [`Bag`]; the two differ only
/// in semantic role (one row vs. a collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuple {
    /// Row schema
    pub schema: Schema,
}

impl Tuple {
    /// Create a tuple of the given row schema
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tuple<{}>", self.schema)
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
