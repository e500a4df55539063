// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Remote content fetch.
//!
//! The resolver only sees [`ContentStore`]. A missing object is `Ok(None)`;
//! any other failure is a transport fault and propagates as an error.

use crate::Result;
use crate::error::ReadingsError;
use async_trait::async_trait;
use bytes::Bytes;
use diagnostics::*;
use object_store::ObjectStore;
use object_store::path::Path;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Content of one fetched object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedContent {
    pub name: String,
    pub content: Bytes,
}

/// Source of record files and historical archives
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the object at `path`, or `None` if it does not exist
    async fn fetch(&self, path: &str) -> Result<Option<RetrievedContent>>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    async fn fetch(&self, path: &str) -> Result<Option<RetrievedContent>> {
        (**self).fetch(path).await
    }
}

/// [`ContentStore`] over any `object_store` backend
#[derive(Debug, Clone)]
pub struct ObjectContentStore {
    store: Arc<dyn ObjectStore>,
    prefix: Option<Path>,
}

impl ObjectContentStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: None,
        }
    }

    /// Resolve every fetched path below `prefix`
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        self.prefix = (!trimmed.is_empty()).then(|| Path::from(trimmed));
        self
    }

    fn location(&self, path: &str) -> Path {
        let relative = path.trim_start_matches('/');
        match &self.prefix {
            Some(prefix) => Path::from(format!("{prefix}/{relative}")),
            None => Path::from(relative),
        }
    }
}

#[async_trait]
impl ContentStore for ObjectContentStore {
    async fn fetch(&self, path: &str) -> Result<Option<RetrievedContent>> {
        let location = self.location(path);
        let key = location.to_string();
        debug!("Fetching {key}", key);

        let result = match self.store.get(&location).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                debug!("Object {key} does not exist", key);
                return Ok(None);
            }
            Err(e) => return Err(ReadingsError::ObjectStore(e)),
        };

        let content = result.bytes().await?;
        let size = content.len();
        debug!("Fetched {key} ({size} bytes)", key, size);

        Ok(Some(RetrievedContent {
            name: path.to_string(),
            content,
        }))
    }
}

/// Object store location and credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// `file:///path`, a plain path, `memory://`, or `s3://bucket/prefix`
    pub url: String,

    /// AWS region (for S3)
    #[serde(default)]
    pub region: String,

    /// AWS access key
    #[serde(default)]
    pub access_key: String,

    /// AWS secret key
    #[serde(default)]
    pub secret_key: String,

    /// Custom S3 endpoint (for MinIO, R2, etc.)
    #[serde(default)]
    pub endpoint: String,
}

/// Build a content store for `config.url`
pub fn build_content_store(config: &StoreConfig) -> Result<ObjectContentStore> {
    if config.url.starts_with("memory://") {
        return Ok(ObjectContentStore::new(Arc::new(
            object_store::memory::InMemory::new(),
        )));
    }

    if let Some(url_path) = config.url.strip_prefix("s3://") {
        let (bucket, prefix) = url_path.split_once('/').unwrap_or((url_path, ""));
        if bucket.is_empty() {
            return Err(ReadingsError::Configuration(format!(
                "S3 url has no bucket: {}",
                config.url
            )));
        }

        let mut builder = object_store::aws::AmazonS3Builder::new().with_bucket_name(bucket);

        if !config.region.is_empty() {
            builder = builder.with_region(&config.region);
        }
        if !config.access_key.is_empty() {
            builder = builder.with_access_key_id(&config.access_key);
        }
        if !config.secret_key.is_empty() {
            builder = builder.with_secret_access_key(&config.secret_key);
        }
        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
        }

        let store = builder.build().map_err(|e| {
            ReadingsError::Configuration(format!("Failed to build S3 store: {}", e))
        })?;

        info!("Using S3 bucket {bucket}", bucket);
        return Ok(ObjectContentStore::new(Arc::new(store)).with_prefix(prefix));
    }

    // Local file system
    let path = config.url.strip_prefix("file://").unwrap_or(&config.url);
    if path.is_empty() {
        return Err(ReadingsError::Configuration(
            "store url cannot be empty".to_string(),
        ));
    }
    let store = object_store::local::LocalFileSystem::new_with_prefix(path).map_err(|e| {
        ReadingsError::Configuration(format!("Failed to build local store: {}", e))
    })?;
    info!("Using local store at {path}", path);
    Ok(ObjectContentStore::new(Arc::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::PutPayload;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_fetch_present_and_absent() {
        let memory = Arc::new(InMemory::new());
        let _ = memory
            .put(
                &Path::from("dockan/temperature/2019-01-10.csv"),
                PutPayload::from_static(b"2019-01-10T00:00:00;1\n"),
            )
            .await
            .unwrap();

        let store = ObjectContentStore::new(memory);
        let found = store
            .fetch("dockan/temperature/2019-01-10.csv")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "dockan/temperature/2019-01-10.csv");
        assert_eq!(&found.content[..], b"2019-01-10T00:00:00;1\n");

        let missing = store.fetch("dockan/temperature/2019-01-11.csv").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fetch_with_prefix() {
        let memory = Arc::new(InMemory::new());
        let _ = memory
            .put(
                &Path::from("weather/dockan/rainfall/historical.zip"),
                PutPayload::from_static(b"zip"),
            )
            .await
            .unwrap();

        let store = ObjectContentStore::new(memory).with_prefix("/weather/");
        let found = store.fetch("dockan/rainfall/historical.zip").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let device_dir = dir.path().join("dockan").join("humidity");
        std::fs::create_dir_all(&device_dir).unwrap();
        std::fs::write(device_dir.join("2019-01-10.csv"), b"2019-01-10T00:00:00;,5\n").unwrap();

        let config = StoreConfig {
            url: format!("file://{}", dir.path().display()),
            ..Default::default()
        };
        let store = build_content_store(&config).unwrap();

        let found = store.fetch("dockan/humidity/2019-01-10.csv").await.unwrap();
        assert_eq!(found.unwrap().content.len(), 23);
        assert!(store.fetch("dockan/humidity/2019-01-11.csv").await.unwrap().is_none());
    }

    #[test]
    fn test_build_rejects_empty_bucket() {
        let config = StoreConfig {
            url: "s3:///prefix".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_content_store(&config),
            Err(ReadingsError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_rejects_empty_url() {
        assert!(build_content_store(&StoreConfig::default()).is_err());
    }
}
