use thiserror::Error;

/// Errors that can arise while interacting with the kennel engine or its storage.
#[derive(Debug, Error)]
pub enum KennelError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Request was malformed (empty name, oversized chat text, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Action keyword did not map to a known action kind
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Owner already holds a puppy personally
    #[error("already holding a puppy: {0}")]
    AlreadyHolding(String),

    /// Internal error (poisoned locks, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<crate::validation::NameError> for KennelError {
    fn from(err: crate::validation::NameError) -> Self {
        KennelError::InvalidInput(err.to_string())
    }
}
