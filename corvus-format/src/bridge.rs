//! Arrow <-> native string column bridge.
//!
//! The engine's scan layer hands batches around as Arrow arrays; the format
//! kernel runs over the native terminator-delimited layout. This module
//! converts at that boundary.
//!
//! Nullable arrays are rejected: the format kernel has no null story, and
//! the planner masks nulls out before dispatching string functions.

use arrow::array::{
    Array, ArrayRef, FixedSizeBinaryArray, Int64Array, LargeStringArray, StringArray,
    StringBuilder,
};
use corvus_result::{Error, Result};

use crate::column::{Column, FixedStringColumn, StringColumn};

/// Convert one Arrow array into the kernel's native column representation.
pub fn column_from_arrow(array: &ArrayRef) -> Result<Column> {
    if array.null_count() > 0 {
        return Err(Error::InvalidArgumentError(
            "nullable columns are not supported by the format kernel".into(),
        ));
    }
    if let Some(strings) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(Column::Utf8(StringColumn::from_values(
            (0..strings.len()).map(|row| strings.value(row)),
        )));
    }
    if let Some(strings) = array.as_any().downcast_ref::<LargeStringArray>() {
        return Ok(Column::Utf8(StringColumn::from_values(
            (0..strings.len()).map(|row| strings.value(row)),
        )));
    }
    if let Some(fixed) = array.as_any().downcast_ref::<FixedSizeBinaryArray>() {
        let width = fixed.value_length() as usize;
        let column =
            FixedStringColumn::from_values(width, (0..fixed.len()).map(|row| fixed.value(row)))?;
        return Ok(Column::FixedUtf8(column));
    }
    if let Some(ints) = array.as_any().downcast_ref::<Int64Array>() {
        return Ok(Column::Int64(ints.values().to_vec()));
    }
    Err(Error::InvalidArgumentError(format!(
        "unsupported arrow type {} for the format kernel",
        array.data_type()
    )))
}

/// Convert a native string column into an Arrow `StringArray`.
pub fn column_to_arrow(column: &StringColumn) -> Result<StringArray> {
    let mut builder = StringBuilder::with_capacity(column.len(), column.data().len());
    for row in 0..column.len() {
        let value = std::str::from_utf8(column.value(row)).map_err(|err| {
            Error::InvalidArgumentError(format!("row {row} is not valid UTF-8: {err}"))
        })?;
        builder.append_value(value);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn string_array_round_trips_through_the_native_layout() {
        let array: ArrayRef = Arc::new(StringArray::from(vec!["a", "", "long value"]));
        let column = column_from_arrow(&array).unwrap();
        let Column::Utf8(native) = &column else {
            panic!("expected Utf8 column");
        };
        assert_eq!(native.value(0), b"a");
        assert_eq!(native.value(2), b"long value");

        let back = column_to_arrow(native).unwrap();
        assert_eq!(back.value(0), "a");
        assert_eq!(back.value(1), "");
        assert_eq!(back.value(2), "long value");
    }

    #[test]
    fn fixed_size_binary_maps_to_fixed_strings() {
        let array: ArrayRef = Arc::new(
            FixedSizeBinaryArray::try_from_iter(vec![b"ab".to_vec(), b"cd".to_vec()].into_iter())
                .unwrap(),
        );
        let column = column_from_arrow(&array).unwrap();
        let Column::FixedUtf8(native) = &column else {
            panic!("expected FixedUtf8 column");
        };
        assert_eq!(native.width(), 2);
        assert_eq!(native.value(1), b"cd");
    }

    #[test]
    fn nullable_arrays_are_rejected() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("a"), None]));
        let err = column_from_arrow(&array).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
    }

    #[test]
    fn int64_arrays_become_non_string_columns() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
        let column = column_from_arrow(&array).unwrap();
        assert!(!column.is_string_like());
        assert_eq!(column.row_count(), Some(3));
    }
}
