use thiserror::Error;

/// Errors raised while reading or writing the item table.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Wrapper around IO errors (open, lock, rename, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but is not a valid item table.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Returned when serializing the table back to JSON fails.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file on disk is larger than the configured limit.
    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },
}
