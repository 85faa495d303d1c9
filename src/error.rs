use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid record ID format: {0}")]
    InvalidRecordId(String),

    #[error("Invalid sort direction '{0}'. Valid directions: asc, desc")]
    InvalidSortDirection(String),

    #[error("Unknown stage: {0}")]
    InvalidStage(String),

    #[error("Drag preview unavailable: {0}")]
    PreviewUnavailable(String),

    #[error("Move of {item_id} from {from} to {to} was rejected: {source}")]
    MoveRejected {
        item_id: String,
        from: String,
        to: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Record store not initialized")]
    StoreNotInitialized,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
