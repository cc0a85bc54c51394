use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage not configured: {0}")]
    Configuration(String),

    /// A previous computation for the same key failed; the stored message is replayed.
    #[error("cached failure: {0}")]
    CachedFailure(String),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
