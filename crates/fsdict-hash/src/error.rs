//! Error types for the hash crate.

/// Errors produced while configuring an addressing scheme.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    /// The algorithm name is not one of the supported digests.
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Depth must be at least one and no larger than the digest length.
    #[error("invalid depth {depth} for digest length {length}")]
    InvalidDepth { depth: usize, length: usize },

    /// Digest length must be positive and fit the algorithm's output.
    #[error("invalid digest length {length} (algorithm produces {natural} hex characters)")]
    InvalidLength { length: usize, natural: usize },

    /// The persisted configuration record could not be parsed.
    #[error("malformed hash configuration record: {0:?}")]
    MalformedRecord(String),
}

/// Convenience alias for hash results.
pub type HashResult<T> = Result<T, HashError>;
