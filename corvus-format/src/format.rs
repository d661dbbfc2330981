//! Engine-facing entry point for the `format` scalar function.
//!
//! The planner's type check runs before dispatch, but the kernel
//! re-validates everything it depends on: arity, string-likeness, the
//! constness of the template argument, and row-count agreement.

use corvus_result::{Error, Result};

use crate::column::{Column, ColumnView, StringColumn};
use crate::executor::execute;
use crate::template::compile;

/// Hard ceiling on total call arguments, template included.
pub const MAX_FORMAT_ARGUMENTS: usize = 1024;

/// Vectorized `format(template, args...)`.
///
/// `columns[0]` must be a constant template string; the remaining columns
/// are the substitution arguments, each a variable-length, fixed-length, or
/// constant string column with `row_count` rows (constants are
/// row-independent). Returns a variable-length string column with one
/// formatted row per input row.
///
/// The template is recompiled on every call; there is no cross-call cache.
pub fn format_string(columns: &[Column], row_count: usize) -> Result<StringColumn> {
    validate_arity(columns.len())?;

    for (argument, column) in columns.iter().enumerate() {
        if !column.is_string_like() {
            return Err(Error::IllegalType {
                argument,
                actual: column.type_name().to_string(),
            });
        }
    }

    let template = match &columns[0] {
        Column::Const(col) => col.value(),
        other => {
            return Err(Error::illegal_column(
                0,
                format!(
                    "first argument of format must be a constant string, got {}",
                    other.type_name()
                ),
            ));
        }
    };

    let mut views = Vec::with_capacity(columns.len() - 1);
    for (offset, column) in columns[1..].iter().enumerate() {
        let argument = offset + 1;
        if let Some(rows) = column.row_count()
            && rows != row_count
        {
            return Err(Error::Internal(format!(
                "argument {argument} has {rows} rows, expected {row_count}"
            )));
        }
        views.push(ColumnView::classify(column, argument)?);
    }

    let constants: Vec<Option<&[u8]>> = views.iter().map(ColumnView::const_value).collect();
    let compiled = compile(template, &constants)?;
    tracing::debug!(
        segments = compiled.segments().len(),
        slots = compiled.slots().len(),
        rows = row_count,
        "compiled format template"
    );

    execute(&compiled, &views, row_count)
}

fn validate_arity(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgumentError(
            "format expects at least 1 argument (the template)".into(),
        ));
    }
    if count > MAX_FORMAT_ARGUMENTS {
        return Err(Error::InvalidArgumentError(format!(
            "format expects at most {MAX_FORMAT_ARGUMENTS} arguments, got {count}"
        )));
    }
    Ok(())
}
