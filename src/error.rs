use thiserror::Error;

/// Errors returned by [`ProbingTable`](crate::ProbingTable) operations.
///
/// None of these are transient; a failed operation leaves the table exactly
/// as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The key passed to the operation is absent (see [`Absent`](crate::Absent)).
    #[error("key must not be absent")]
    InvalidKey,
    /// The value passed to `set` is absent.
    #[error("value must not be absent")]
    InvalidValue,
    /// The key is not stored in the table.
    #[error("key not found")]
    KeyNotFound,
}
