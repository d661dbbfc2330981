use std::io;
use thiserror::Error;

/// Unified error type for all corvus operations.
///
/// Errors propagate upward through the call stack with the `?` operator. At
/// API boundaries they are converted to user-facing messages; internal code
/// matches on variants for fine-grained handling.
///
/// `Error` is `Send + Sync`, so failures can cross thread boundaries during
/// parallel batch execution.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file or disk operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error during columnar data operations, typically at
    /// the batch boundary where corvus converts to and from Arrow arrays.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter: bad arity, malformed call
    /// shapes, unsupported inputs at a public surface.
    ///
    /// These errors are recoverable — fix the input and retry.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// An argument has a logical type the operation cannot accept.
    ///
    /// `argument` is the zero-based position in the original call.
    #[error("illegal type {actual} of argument {argument}")]
    IllegalType { argument: usize, actual: String },

    /// An argument column has a physical representation the operation
    /// cannot read — e.g. a non-constant column where a constant is
    /// required, or a layout outside the operation's closed set.
    #[error("illegal column of argument {argument}: {message}")]
    IllegalColumn { argument: usize, message: String },

    /// A template string failed to compile.
    ///
    /// `position` is the byte offset of the offending token within the
    /// template.
    #[error("template error at byte {position}: {message}")]
    Template { position: usize, message: String },

    /// Internal error indicating a bug or violated invariant.
    ///
    /// This should never occur during normal operation. If you encounter
    /// it, it likely indicates a corvus defect that should be reported
    /// with reproduction steps.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an [`Error::IllegalColumn`] for the given argument position.
    #[inline]
    pub fn illegal_column(argument: usize, message: impl Into<String>) -> Self {
        Error::IllegalColumn {
            argument,
            message: message.into(),
        }
    }

    /// Create an [`Error::Template`] at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use corvus_result::Error;
    ///
    /// let err = Error::template(3, "closed curly brace without open one");
    /// assert!(matches!(err, Error::Template { position: 3, .. }));
    /// ```
    #[inline]
    pub fn template(position: usize, message: impl Into<String>) -> Self {
        Error::Template {
            position,
            message: message.into(),
        }
    }
}
