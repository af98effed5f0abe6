//! Raw object access behind the household store.

use std::fmt;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use guest_config::S3Config;

use crate::error::StoreError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Minimal key/value surface the household store needs.
///
/// Keys are full object keys, prefix included.
pub trait ObjectBackend: Send + Sync + fmt::Debug {
    /// Fetch an object body. A missing key is `Ok(None)`.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StoreError>>;

    /// Write a JSON object body.
    fn put<'a>(&'a self, key: &'a str, body: Vec<u8>) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Remove an object. Removing a missing key succeeds.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Every key under `prefix`, across all result pages.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>>;
}

/// [`ObjectBackend`] over any `object_store` implementation.
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// S3 client from configuration.
    ///
    /// Credentials left empty fall through to the standard AWS environment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ObjectStore` if the builder rejects the settings.
    pub fn from_config(config: &S3Config) -> Result<Self, StoreError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&config.bucket);
        if !config.region.is_empty() {
            builder = builder.with_region(&config.region);
        }
        if !config.access_key_id.is_empty() {
            builder = builder.with_access_key_id(&config.access_key_id);
        }
        if !config.secret_access_key.is_empty() {
            builder = builder.with_secret_access_key(&config.secret_access_key);
        }
        if !config.endpoint.is_empty() {
            builder = builder
                .with_endpoint(&config.endpoint)
                .with_allow_http(config.endpoint.starts_with("http://"));
        }
        let store = builder.build()?;
        tracing::info!(bucket = %config.bucket, "S3 guest list store ready");
        Ok(Self::new(Arc::new(store)))
    }

    /// Process-local store, for tests and offline runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }
}

fn object_path(key: &str) -> Result<Path, StoreError> {
    Path::parse(key).map_err(|e| StoreError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl ObjectBackend for ObjectStoreBackend {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StoreError>> {
        Box::pin(async move {
            let path = object_path(key)?;
            match self.inner.get(&path).await {
                Ok(result) => Ok(Some(result.bytes().await?.to_vec())),
                Err(object_store::Error::NotFound { .. }) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn put<'a>(&'a self, key: &'a str, body: Vec<u8>) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let path = object_path(key)?;
            let opts = PutOptions {
                attributes: Attributes::from_iter([(Attribute::ContentType, JSON_CONTENT_TYPE)]),
                ..PutOptions::default()
            };
            self.inner
                .put_opts(&path, PutPayload::from(body), opts)
                .await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let path = object_path(key)?;
            match self.inner.delete(&path).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        Box::pin(async move {
            let prefix = object_path(prefix)?;
            let mut entries = self.inner.list(Some(&prefix));
            let mut keys = Vec::new();
            while let Some(meta) = entries.next().await {
                keys.push(meta?.location.to_string());
            }
            Ok(keys)
        })
    }
}
