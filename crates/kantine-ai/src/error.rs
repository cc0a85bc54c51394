use kantine_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Credentials or storage settings needed by the AI path are absent.
    #[error("not configured: {0}")]
    Configuration(String),

    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A reply that is not JSON or not shaped like a weekday menu.
    #[error("invalid reply: {0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error(transparent)]
    Cache(#[from] StoreError),

    #[error("no menu announcements to extract")]
    NoAnnouncements,
}
