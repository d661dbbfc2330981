//! Physical string-column layouts and the read-only views the format
//! executor extracts row bytes through.
//!
//! Three layouts reach the kernel: variable-length (terminator-delimited
//! payloads plus cumulative end offsets), fixed-length (no terminators),
//! and constant (one payload shared by every row). [`ColumnView`] collapses
//! them into a single tagged variant so per-row extraction is one dispatch
//! over a closed set.

use corvus_result::{Error, Result};

/// Delimiter byte appended after each row payload in [`StringColumn`] data.
pub const STRING_TERMINATOR: u8 = 0;

/// Variable-length string column.
///
/// Row payloads are stored back to back in `data`, each followed by one
/// terminator byte. `offsets[i]` is the cumulative end of row `i`
/// *including* its terminator, so the payload of row `i` is
/// `data[offsets[i-1] .. offsets[i] - 1]` (with `offsets[-1]` read as 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringColumn {
    data: Vec<u8>,
    offsets: Vec<u64>,
}

impl StringColumn {
    /// Build a column from row values, appending one terminator per row.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut data = Vec::new();
        let mut offsets = Vec::new();
        for value in values {
            data.extend_from_slice(value.as_ref());
            data.push(STRING_TERMINATOR);
            offsets.push(data.len() as u64);
        }
        StringColumn { data, offsets }
    }

    /// Assemble a column from raw parts, validating the layout invariants:
    /// offsets must be strictly increasing (every row carries at least its
    /// terminator byte) and the last offset must equal the data length.
    pub fn from_parts(data: Vec<u8>, offsets: Vec<u64>) -> Result<Self> {
        let mut previous = 0u64;
        for (row, &end) in offsets.iter().enumerate() {
            if end <= previous {
                return Err(Error::InvalidArgumentError(format!(
                    "string column offset for row {row} ({end}) does not advance past {previous}"
                )));
            }
            previous = end;
        }
        if previous != data.len() as u64 {
            return Err(Error::InvalidArgumentError(format!(
                "string column data has {} bytes but offsets end at {previous}",
                data.len()
            )));
        }
        Ok(StringColumn { data, offsets })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Payload bytes of row `row`, terminator excluded.
    pub fn value(&self, row: usize) -> &[u8] {
        let start = if row == 0 {
            0
        } else {
            self.offsets[row - 1] as usize
        };
        let end = self.offsets[row] as usize - 1;
        &self.data[start..end]
    }

    /// Iterate row payloads in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(|row| self.value(row))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

/// Fixed-length string column: every row is exactly `width` bytes, stored
/// contiguously with no terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStringColumn {
    data: Vec<u8>,
    width: usize,
}

impl FixedStringColumn {
    /// Build a column from row values, each of which must be exactly
    /// `width` bytes. `width` must be nonzero.
    pub fn from_values<I, V>(width: usize, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        if width == 0 {
            return Err(Error::InvalidArgumentError(
                "fixed string width must be nonzero".into(),
            ));
        }
        let mut data = Vec::new();
        for (row, value) in values.into_iter().enumerate() {
            let bytes = value.as_ref();
            if bytes.len() != width {
                return Err(Error::InvalidArgumentError(format!(
                    "fixed string row {row} has {} bytes, expected {width}",
                    bytes.len()
                )));
            }
            data.extend_from_slice(bytes);
        }
        Ok(FixedStringColumn { data, width })
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Payload bytes of row `row`: `data[width*row .. width*row + width]`.
    pub fn value(&self, row: usize) -> &[u8] {
        let start = self.width * row;
        &self.data[start..start + self.width]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Constant string column: one payload shared by every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstColumn {
    value: Vec<u8>,
}

impl ConstColumn {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        ConstColumn {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Physical column representations reaching the format kernel.
///
/// The engine owns a wider union; this closed set is what string functions
/// see. `Int64` stands in for every non-string representation so rejection
/// paths stay exercised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Utf8(StringColumn),
    FixedUtf8(FixedStringColumn),
    Const(ConstColumn),
    Int64(Vec<i64>),
}

impl Column {
    /// Engine-facing name of the column's logical type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Utf8(_) => "String",
            Column::FixedUtf8(_) => "FixedString",
            Column::Const(_) => "Const(String)",
            Column::Int64(_) => "Int64",
        }
    }

    /// Whether string functions can consume this column.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            Column::Utf8(_) | Column::FixedUtf8(_) | Column::Const(_)
        )
    }

    /// Row count, or `None` for constants, which are row-independent.
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Column::Utf8(col) => Some(col.len()),
            Column::FixedUtf8(col) => Some(col.len()),
            Column::Const(_) => None,
            Column::Int64(values) => Some(values.len()),
        }
    }
}

/// Read-only per-argument view: classification of one substitution argument
/// plus uniform byte-range extraction for a given row, whatever the
/// underlying layout.
///
/// Views borrow from the argument columns and live for one invocation.
#[derive(Debug, Clone, Copy)]
pub enum ColumnView<'a> {
    /// Distinct payload length per row; `offsets` are cumulative ends
    /// including one terminator per row.
    Variable { data: &'a [u8], offsets: &'a [u64] },
    /// Identical payload length `width` for every row, no terminators.
    Fixed { data: &'a [u8], width: usize },
    /// Single payload independent of row index.
    Const { value: &'a [u8] },
}

impl<'a> ColumnView<'a> {
    /// Classify one argument column into exactly one of the three string
    /// kinds. `argument` is the zero-based position in the original call,
    /// used for error reporting only.
    pub fn classify(column: &'a Column, argument: usize) -> Result<Self> {
        match column {
            Column::Utf8(col) => Ok(ColumnView::Variable {
                data: col.data(),
                offsets: col.offsets(),
            }),
            Column::FixedUtf8(col) => Ok(ColumnView::Fixed {
                data: col.data(),
                width: col.width(),
            }),
            Column::Const(col) => Ok(ColumnView::Const { value: col.value() }),
            other => Err(Error::illegal_column(
                argument,
                format!("cannot read {} column as a string", other.type_name()),
            )),
        }
    }

    /// Payload bytes for row `row`.
    pub fn value(&self, row: usize) -> &'a [u8] {
        match *self {
            ColumnView::Variable { data, offsets } => {
                let start = if row == 0 {
                    0
                } else {
                    offsets[row - 1] as usize
                };
                // The terminator byte is physical layout, not payload.
                let end = offsets[row] as usize - 1;
                &data[start..end]
            }
            ColumnView::Fixed { data, width } => &data[width * row..width * row + width],
            ColumnView::Const { value } => value,
        }
    }

    /// The shared payload if this argument is a constant.
    pub fn const_value(&self) -> Option<&'a [u8]> {
        match *self {
            ColumnView::Const { value } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_column_layout_and_extraction() {
        let col = StringColumn::from_values(["alpha", "", "bc"]);
        assert_eq!(col.len(), 3);
        // 5+1, 0+1, 2+1 bytes -> cumulative ends 6, 7, 10.
        assert_eq!(col.offsets(), &[6, 7, 10]);
        assert_eq!(col.data().len(), 10);
        assert_eq!(col.value(0), b"alpha");
        assert_eq!(col.value(1), b"");
        assert_eq!(col.value(2), b"bc");
        assert_eq!(col.iter().collect::<Vec<_>>(), vec![
            b"alpha" as &[u8],
            b"",
            b"bc"
        ]);
    }

    #[test]
    fn string_column_from_parts_validates_offsets() {
        // Non-advancing offset (row must carry at least its terminator).
        assert!(StringColumn::from_parts(vec![b'a', 0], vec![2, 2]).is_err());
        // Last offset disagrees with data length.
        assert!(StringColumn::from_parts(vec![b'a', 0], vec![3]).is_err());
        // Dangling data with no offsets.
        assert!(StringColumn::from_parts(vec![b'a'], vec![]).is_err());

        let col = StringColumn::from_parts(vec![b'a', 0, b'b', b'c', 0], vec![2, 5]).unwrap();
        assert_eq!(col.value(0), b"a");
        assert_eq!(col.value(1), b"bc");
    }

    #[test]
    fn fixed_string_column_extraction() {
        let col = FixedStringColumn::from_values(2, ["ab", "cd", "ef"]).unwrap();
        assert_eq!(col.len(), 3);
        assert_eq!(col.value(0), b"ab");
        assert_eq!(col.value(2), b"ef");

        assert!(FixedStringColumn::from_values(2, ["abc"]).is_err());
        assert!(FixedStringColumn::from_values(0, ["", ""]).is_err());
    }

    #[test]
    fn classify_covers_the_closed_set() {
        let utf8 = Column::Utf8(StringColumn::from_values(["x"]));
        let fixed = Column::FixedUtf8(FixedStringColumn::from_values(1, ["x"]).unwrap());
        let constant = Column::Const(ConstColumn::new("x"));

        assert!(matches!(
            ColumnView::classify(&utf8, 1).unwrap(),
            ColumnView::Variable { .. }
        ));
        assert!(matches!(
            ColumnView::classify(&fixed, 1).unwrap(),
            ColumnView::Fixed { .. }
        ));
        assert!(matches!(
            ColumnView::classify(&constant, 1).unwrap(),
            ColumnView::Const { .. }
        ));

        let ints = Column::Int64(vec![1, 2]);
        let err = ColumnView::classify(&ints, 3).unwrap_err();
        assert!(matches!(
            err,
            corvus_result::Error::IllegalColumn { argument: 3, .. }
        ));
    }

    #[test]
    fn const_view_is_row_independent() {
        let constant = Column::Const(ConstColumn::new("shared"));
        let view = ColumnView::classify(&constant, 1).unwrap();
        assert_eq!(view.value(0), b"shared");
        assert_eq!(view.value(41), b"shared");
        assert_eq!(view.const_value(), Some(b"shared" as &[u8]));
    }
}
