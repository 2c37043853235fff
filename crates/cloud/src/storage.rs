//! Object storage backends.
//!
//! [`S3Store`] is the production backend; [`LocalStore`] writes to a
//! directory served as static files and is used in development and tests.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

/// A place to put bytes and get back a public URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL of the object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, StorageError>;

    /// Remove the object under `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Key of an object this store served at `url`, or `None` when the URL
    /// points elsewhere.
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Build a collision-free key: `{folder}/{yyyymmdd}/{uuid}.{ext}`.
pub fn object_key(folder: &str, extension: &str) -> String {
    let date = chrono::Utc::now().format("%Y%m%d");
    let id = uuid::Uuid::now_v7();
    let folder = folder.trim_matches('/');
    let extension = extension.trim_start_matches('.');
    format!("{folder}/{date}/{id}.{extension}")
}

/// Reject empty keys, absolute paths and any `..` traversal.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let path = Path::new(key);
    let ok = !key.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Strip `prefix` from `url` and return the rest when it is a valid key.
fn key_under(prefix: &str, url: &str) -> Option<String> {
    let key = url.strip_prefix(prefix)?;
    validate_key(key).ok()?;
    Some(key.to_string())
}

// ---------------------------------------------------------------------------
// S3
// ---------------------------------------------------------------------------

/// Amazon S3 (or compatible) backend.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3Store {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: String,
        region: String,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            client,
            bucket,
            region,
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Build a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env(bucket: String, region: String, public_base_url: Option<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, region, public_base_url)
    }

    /// Public URL for `key`.
    pub fn object_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/{key}"),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            ),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!(bucket = %self.bucket, key, size, "Uploaded object to S3");
        Ok(self.object_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!(bucket = %self.bucket, key, "Deleted object from S3");
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        key_under(&self.object_url(""), url)
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

/// Filesystem backend rooted at a directory.
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    /// * `root` - Directory objects are written under.
    /// * `public_base_url` - URL prefix the directory is served from.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory objects are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored object locally");
        Ok(format!("{}/{key}", self.public_base_url))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.root.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted local object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        key_under(&format!("{}/", self.public_base_url), url)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
