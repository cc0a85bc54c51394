//! Content-addressed cache of expensive computations, kept in object storage.
//!
//! Entries are keyed by the SHA-256 of the input and hold either the result
//! or the error message of the computation that produced them. Failures are
//! stored too: a computation known to fail for an input is never re-run for
//! that input. There is no local layer and no expiry; bumping the key prefix
//! starts a fresh key space without touching old entries.
//!
//! # Layout
//!
//! - key: `{prefix}/{hex[0..2]}/{hex}` (or `{hex[0..2]}/{hex}` without prefix)
//! - body: `{"result": <value or message>, "status": "success" | "error"}`

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use object_store::path::Path;
use object_store::{ObjectStore, ObjectStoreExt, PutMode, PutOptions, PutPayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::{S3Config, StoreError};

/// Where cache entries live.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub bucket: Option<String>,
    pub s3: S3Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CacheStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    result: Value,
    status: CacheStatus,
}

/// Lower-case hex SHA-256 of the key material.
pub fn fingerprint(key_material: &[u8]) -> String {
    hex::encode(Sha256::digest(key_material))
}

/// Remote cache mapping input fingerprints to stored outcomes.
pub struct ContentCache {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ContentCache {
    /// Connect to the cache bucket. Bucket, endpoint and both credentials are required.
    pub fn from_config(config: &CacheConfig, prefix: &str) -> Result<Self, StoreError> {
        let store = config.s3.connect(config.bucket.as_deref(), true)?;
        Ok(Self::with_store(store, prefix))
    }

    /// Use an existing object store, e.g. `object_store::memory::InMemory` in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Object key for the given input.
    pub fn object_key(&self, key_material: &[u8]) -> Path {
        let digest = fingerprint(key_material);
        let shard = &digest[..2];
        if self.prefix.is_empty() {
            Path::from(format!("{shard}/{digest}"))
        } else {
            Path::from(format!("{}/{shard}/{digest}", self.prefix))
        }
    }

    /// Return the stored outcome for `key_material`, or run `compute` and store its outcome.
    ///
    /// - stored success: returned without running `compute`
    /// - stored failure: replayed as [`StoreError::CachedFailure`], `compute` is not run
    /// - nothing stored: `compute` runs once; `Ok` is stored before it is
    ///   returned, `Err` is stored as its message and then returned unchanged
    pub async fn get_or_compute<T, E, F, Fut>(&self, key_material: &[u8], compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError> + fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = self.object_key(key_material);

        if let Some(record) = self.lookup(&key).await? {
            info!(key = %key, "cache hit");
            return match record.status {
                CacheStatus::Success => {
                    Ok(serde_json::from_value(record.result).map_err(StoreError::from)?)
                }
                CacheStatus::Error => {
                    let message = match record.result {
                        Value::String(message) => message,
                        other => other.to_string(),
                    };
                    warn!(key = %key, error = %message, "replaying cached failure");
                    Err(StoreError::CachedFailure(message).into())
                }
            };
        }

        info!(key = %key, "cache miss");
        match compute().await {
            Ok(value) => {
                let record = CacheRecord {
                    result: serde_json::to_value(&value).map_err(StoreError::from)?,
                    status: CacheStatus::Success,
                };
                self.put_record(&key, &record).await?;
                Ok(value)
            }
            Err(err) => {
                let record = CacheRecord {
                    result: Value::String(err.to_string()),
                    status: CacheStatus::Error,
                };
                if let Err(store_err) = self.put_record(&key, &record).await {
                    warn!(key = %key, error = %store_err, "could not store failure");
                }
                Err(err)
            }
        }
    }

    async fn lookup(&self, key: &Path) -> Result<Option<CacheRecord>, StoreError> {
        match self.store.get(key).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a record unless one already exists.
    ///
    /// The record is a pure function of the key, so losing a race to another
    /// writer is fine.
    async fn put_record(&self, key: &Path, record: &CacheRecord) -> Result<(), StoreError> {
        let payload = PutPayload::from(serde_json::to_vec(record)?);
        let opts = PutOptions {
            mode: PutMode::Create,
            ..Default::default()
        };

        match self.store.put_opts(key, payload.clone(), opts).await {
            Ok(_) => {
                debug!(key = %key, "stored cache entry");
                Ok(())
            }
            Err(object_store::Error::AlreadyExists { .. })
            | Err(object_store::Error::Precondition { .. }) => {
                debug!(key = %key, "cache entry already written");
                Ok(())
            }
            Err(object_store::Error::NotSupported { .. })
            | Err(object_store::Error::NotImplemented { .. }) => {
                warn!("conditional writes not supported by backend, falling back to plain put");
                self.store.put(key, payload).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
