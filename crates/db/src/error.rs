//! Store-level error types.

use mongodb::bson;
use tableau_core::Collection;
use tableau_shared::AppError;
use thiserror::Error;

/// Errors raised while talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver failed (connectivity, authorization, server error).
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A value could not be converted into a document.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    /// A stored document does not have the expected shape.
    #[error("Failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    /// The pipeline cannot be evaluated (bad pattern, malformed pairs).
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// A document with the same `_id` already exists.
    #[error("Duplicate key in {collection}: {id}")]
    DuplicateKey {
        /// Target collection.
        collection: Collection,
        /// Conflicting ID.
        id: String,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { .. } => Self::Conflict(err.to_string()),
            StoreError::Decode(_) | StoreError::Encode(_) => Self::Internal(err.to_string()),
            StoreError::Mongo(_) | StoreError::InvalidPipeline(_) => Self::Database(err.to_string()),
        }
    }
}
