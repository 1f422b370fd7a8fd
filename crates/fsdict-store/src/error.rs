use std::path::PathBuf;

use fsdict_hash::HashError;
use fsdict_index::IndexError;

/// Errors from dictionary operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is not stored in the dictionary.
    #[error("key not found: {}", .key.escape_ascii())]
    KeyNotFound { key: Vec<u8> },

    /// The key was indexed but its entry file does not exist.
    #[error("entry file {} missing for key {}", .entry.display(), .key.escape_ascii())]
    EntryMissing { key: Vec<u8>, entry: PathBuf },

    /// The directory has no hash configuration record.
    #[error("no dictionary at {}: hash configuration missing", .0.display())]
    NotInitialized(PathBuf),

    /// `create` was called on a directory that already holds a dictionary.
    #[error("dictionary already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The hash configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] HashError),

    /// A bucket index could not be parsed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// The operation is deliberately not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// I/O error from the file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn key_not_found(key: &[u8]) -> Self {
        Self::KeyNotFound { key: key.to_vec() }
    }

    /// Whether this is one of the not-found conditions: an absent key, a
    /// missing entry file, or a directory without a dictionary.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. }
                | Self::EntryMissing { .. }
                | Self::NotInitialized(_)
                | Self::Index(IndexError::KeyNotFound(_))
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_category() {
        assert!(StoreError::key_not_found(b"k").is_not_found());
        assert!(StoreError::NotInitialized("/x".into()).is_not_found());
        assert!(StoreError::Index(IndexError::KeyNotFound(vec![])).is_not_found());
        assert!(!StoreError::Unsupported("merge").is_not_found());
        assert!(!StoreError::Configuration(HashError::UnknownAlgorithm("x".into())).is_not_found());
    }

    #[test]
    fn key_display_escapes_bytes() {
        let err = StoreError::key_not_found(b"a\nb\xff");
        assert_eq!(err.to_string(), "key not found: a\\nb\\xff");
    }
}
