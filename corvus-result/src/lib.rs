//! Error types and result definitions for the corvus engine excerpt.
//!
//! Corvus uses a single error enum ([`Error`]) rather than crate-specific
//! error types. All fallible operations return [`Result<T>`], so errors
//! propagate naturally with the `?` operator across crate boundaries, and
//! callers can match on specific variants for programmatic handling.
//!
//! Every variant carries enough context to localize the fault: argument
//! positions for type and column errors, byte offsets for template syntax
//! errors. Failures are whole-call — no operation produces partial output
//! alongside an error.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
