//! Publishing the week's extracted menus to a public bucket.
//!
//! The document goes to `menu/{week}.json`, and `menu/latest` holds that key
//! as plain text so clients can find the current week. Public read access is
//! granted by the bucket policy, not per object.

use std::sync::Arc;

use object_store::path::Path;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload};
use serde::Serialize;
use tracing::info;

use crate::{S3Config, StoreError};

pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    /// Connect to the public bucket. The endpoint may be omitted for AWS itself.
    pub fn from_config(bucket: &str, s3: &S3Config) -> Result<Self, StoreError> {
        Ok(Self::with_store(s3.connect(Some(bucket), false)?))
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload `document` as the menu for `week` and point `menu/latest` at it.
    ///
    /// Returns the key the document was written to.
    pub async fn publish_week<T: Serialize>(
        &self,
        week: u32,
        document: &T,
    ) -> Result<Path, StoreError> {
        let key = Path::from(format!("menu/{week}.json"));
        let body = serde_json::to_vec(document)?;
        self.put(&key, body, "application/json").await?;

        let latest = Path::from("menu/latest");
        self.put(&latest, key.as_ref().as_bytes().to_vec(), "text/plain")
            .await?;

        info!(key = %key, "published menu");
        Ok(key)
    }

    async fn put(
        &self,
        key: &Path,
        body: Vec<u8>,
        content_type: &'static str,
    ) -> Result<(), StoreError> {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, AttributeValue::from(content_type));
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(key, PutPayload::from(body), opts)
            .await?;
        Ok(())
    }
}
