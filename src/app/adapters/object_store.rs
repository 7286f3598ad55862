//! Object store abstraction
//!
//! The pipeline consumes byte-addressable blob storage keyed by
//! `{bucket, key}` with get, put, copy, and prefix listing. The trait keeps
//! the core testable with fakes and lets deployments swap the concrete
//! store without touching routing logic.

use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;
use walkdir::WalkDir;

/// Byte-addressable blob storage keyed by bucket and path
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full contents of an object
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Write an object in one operation, replacing any existing object
    ///
    /// Writes are atomic at the object level: readers never observe a
    /// partially written destination.
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<()>;

    /// Copy an object between locations
    async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<()>;

    /// List object keys under a prefix, in unspecified order
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

// =============================================================================
// Local Filesystem Store
// =============================================================================

/// Filesystem-backed store mapping `{bucket}/{key}` to `root/bucket/key`
///
/// Lets the CLI run end-to-end against a local directory tree without
/// cloud credentials. Content types are accepted but not recorded; the
/// filesystem has nowhere to keep them.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        for segment in key.split('/') {
            path.push(segment);
        }
        path
    }

    async fn ensure_parent(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::store(bucket, key, format!("failed to create parent directory: {e}"))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::store(bucket, key, format!("read failed: {e}")))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<()> {
        let path = self.object_path(bucket, key);
        self.ensure_parent(&path, bucket, key).await?;

        // Write to a sibling temp file and rename so readers never see a
        // partial object
        let tmp = path.with_extension("tmp-write");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| Error::store(bucket, key, format!("write failed: {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::store(bucket, key, format!("rename failed: {e}")))?;

        debug!("Wrote {} bytes to {}/{}", bytes.len(), bucket, key);
        Ok(())
    }

    async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<()> {
        let src = self.object_path(src_bucket, src_key);
        let dest = self.object_path(dest_bucket, dest_key);
        self.ensure_parent(&dest, dest_bucket, dest_key).await?;

        tokio::fs::copy(&src, &dest)
            .await
            .map_err(|e| Error::store(src_bucket, src_key, format!("copy failed: {e}")))?;
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_root = self.root.join(bucket);
        if !bucket_root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&bucket_root) {
            let entry = entry
                .map_err(|e| Error::store(bucket, prefix, format!("listing failed: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&bucket_root)
                .map_err(|e| Error::store(bucket, prefix, format!("listing failed: {e}")))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if key.starts_with(prefix) {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// An object held by the in-memory store
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object synchronously, for test setup
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        self.objects.write().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes: bytes.into(),
                content_type: String::new(),
            },
        );
    }

    /// Fetch an object synchronously, for test assertions
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// List all keys in a bucket, for test assertions
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.bytes.clone())
            .ok_or_else(|| Error::store(bucket, key, "object not found"))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.objects.write().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<()> {
        let object = self
            .objects
            .read()
            .unwrap()
            .get(&(src_bucket.to_string(), src_key.to_string()))
            .cloned()
            .ok_or_else(|| Error::store(src_bucket, src_key, "object not found"))?;

        self.objects
            .write()
            .unwrap()
            .insert((dest_bucket.to_string(), dest_key.to_string()), object);
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
