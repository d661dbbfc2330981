//! Two-pass row executor: exact size precomputation, then a single fill
//! pass into a buffer that is never resized.
//!
//! Pass 1 must account for every byte pass 2 writes — the equality is a
//! correctness invariant, not a performance nicety. It is enforced with an
//! always-on check after the fill.

use corvus_result::{Error, Result};

use crate::column::{ColumnView, STRING_TERMINATOR, StringColumn};
use crate::template::CompiledTemplate;

/// Materialize one output row per input row.
///
/// Validation happened during classification and compilation; the only
/// failures here are internal-invariant violations.
pub fn execute(
    compiled: &CompiledTemplate,
    views: &[ColumnView<'_>],
    row_count: usize,
) -> Result<StringColumn> {
    let total = precompute_size(compiled, views, row_count)?;

    let segments = compiled.segments();
    let slots = compiled.slots();

    let mut data = Vec::with_capacity(total);
    let mut offsets = Vec::with_capacity(row_count);
    for row in 0..row_count {
        data.extend_from_slice(&segments[0]);
        for (&slot, segment) in slots.iter().zip(&segments[1..]) {
            data.extend_from_slice(views[slot].value(row));
            data.extend_from_slice(segment);
        }
        data.push(STRING_TERMINATOR);
        offsets.push(data.len() as u64);
    }

    if data.len() != total {
        return Err(Error::Internal(format!(
            "format output size mismatch: precomputed {total} bytes, wrote {}",
            data.len()
        )));
    }
    debug_assert_eq!(data.len() as u64, *offsets.last().unwrap_or(&0));

    StringColumn::from_parts(data, offsets)
}

/// Exact total output size in bytes: every literal segment once per row,
/// every slot's per-row payload, and one terminator per row.
///
/// Also the place where compiler invariants are re-checked: a slot that is
/// out of range or refers to a constant view is a compilation bug, not a
/// user error.
fn precompute_size(
    compiled: &CompiledTemplate,
    views: &[ColumnView<'_>],
    row_count: usize,
) -> Result<usize> {
    let mut total = compiled.literal_len() * row_count;

    for &slot in compiled.slots() {
        let view = views.get(slot).ok_or_else(|| {
            Error::Internal(format!(
                "compiled slot {slot} out of range for {} arguments",
                views.len()
            ))
        })?;
        match *view {
            ColumnView::Variable { offsets, .. } => {
                // Cumulative ends include one terminator per row, so the
                // payload total is the last end minus the terminators.
                if row_count > 0 {
                    total += offsets[row_count - 1] as usize - row_count;
                }
            }
            ColumnView::Fixed { width, .. } => {
                total += width * row_count;
            }
            ColumnView::Const { .. } => {
                return Err(Error::Internal(format!(
                    "constant argument {slot} survived template compilation"
                )));
            }
        }
    }

    total += row_count;
    Ok(total)
}
