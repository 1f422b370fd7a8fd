//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    /// The key is not present in the index.
    #[error("key not found in index: {}", .0.escape_ascii())]
    KeyNotFound(Vec<u8>),

    /// The first line of the index is not a decimal counter.
    #[error("malformed index counter: {0:?}")]
    MalformedCounter(String),

    /// An entry identifier is not valid UTF-8, or cannot name a file in the
    /// bucket.
    #[error("invalid entry identifier: \"{}\"", .0.escape_ascii())]
    InvalidIdentifier(Vec<u8>),

    /// The counter is at `u64::MAX`; no new identifier can be assigned.
    #[error("index counter exhausted")]
    CounterExhausted,
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
