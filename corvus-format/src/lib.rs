//! Vectorized `format` scalar function for the corvus engine.
//!
//! Given a constant template string with `{}`/`{N}` placeholders and
//! string-typed column arguments, produces one formatted string per row of
//! a batch. The output buffer is sized exactly in a first pass and filled
//! in a second, so the fill loop never reallocates.
//!
//! Consumed leaf-first:
//! - [`column`]: physical string layouts and the read-only [`ColumnView`]
//!   the executor extracts row bytes through.
//! - [`template`]: compiles the pattern into alternating literal segments
//!   and argument slots, folding constant arguments into the literals.
//! - [`executor`]: the two-pass size/fill loop.
//! - [`format_string`]: the engine-facing entry point that validates the
//!   call and wires the above together.
//! - [`bridge`]: Arrow array conversions for the batch boundary.

#![forbid(unsafe_code)]

pub mod bridge;
pub mod column;
pub mod executor;
pub mod template;

mod format;

pub use column::{Column, ColumnView, ConstColumn, FixedStringColumn, StringColumn};
pub use executor::execute;
pub use format::{MAX_FORMAT_ARGUMENTS, format_string};
pub use template::{CompiledTemplate, compile};
