use crate::error::Error;

/// Result type alias used throughout corvus.
///
/// Shorthand for `std::result::Result<T, Error>`; all corvus operations
/// that can fail should return this type.
pub type Result<T> = std::result::Result<T, Error>;
