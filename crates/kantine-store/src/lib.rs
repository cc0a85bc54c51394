//! Storage layer: S3-compatible object storage for the parse-result cache and
//! the published weekly menus.

mod error;
pub use error::StoreError;

pub mod cache;
pub mod publish;
pub mod s3;

pub use cache::{CacheConfig, ContentCache, fingerprint};
pub use publish::Publisher;
pub use s3::S3Config;
