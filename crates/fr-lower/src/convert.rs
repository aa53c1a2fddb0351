//! Type conversion — relational scalars to iterator record layouts

use crate::error::{LowerError, LowerResult};
use fr_ir::{Bag, FieldType, RecordType, ScalarType, StreamType};

/// Convert a relational scalar type to a record field type
///
/// `Int64` narrows to a 32-bit field: the execution backend only
/// handles 32-bit records, and the narrowing is kept as-is rather than
/// widened here. Pure; the result depends on nothing but the input.
pub fn convert_scalar(ty: ScalarType) -> LowerResult<FieldType> {
    match ty {
        ScalarType::Int32 => Ok(FieldType::Int32),
        ScalarType::Int64 => {
            log::warn!("narrowing int64 to a 32-bit record field");
            Ok(FieldType::Int32)
        }
        ty => Err(LowerError::UnsupportedTypeConversion { ty }),
    }
}

/// Convert a bag's schema to the stream type of its lowered rows
///
/// Field order carries over one-to-one; names are dropped, positions
/// remain.
pub fn convert_bag(bag: &Bag) -> LowerResult<StreamType> {
    let fields = bag
        .schema
        .elements()
        .iter()
        .map(|e| convert_scalar(e.ty))
        .collect::<LowerResult<Vec<_>>>()?;
    Ok(StreamType::new(RecordType::new(fields)))
}
