use crate::error::MirrorError;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// One source object as reported by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectDescriptor {
    pub key: String,
    pub size_bytes: i64,
}

/// A bucket-scoped object store handle. The namespace is resolved into the
/// client endpoint at construction time, so callers only deal in keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all objects under a prefix, following pagination to the end.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectDescriptor>, MirrorError>;

    /// Download one object to a local path, overwriting any existing file.
    async fn download_to(&self, key: &str, dest: &Path) -> Result<(), MirrorError>;

    /// Upload a local file under the given key, replacing any existing
    /// object (idempotent overwrite).
    async fn put_file(&self, key: &str, path: &Path) -> Result<(), MirrorError>;
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectDescriptor>, MirrorError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = continuation.take() {
                req = req.continuation_token(token);
            }

            let page = req.send().await.map_err(|e| {
                MirrorError::Transfer(format!("List failed for prefix '{}': {}", prefix, e))
            })?;

            for obj in page.contents() {
                objects.push(ObjectDescriptor {
                    key: obj.key().unwrap_or_default().to_string(),
                    size_bytes: obj.size().unwrap_or(0),
                });
            }

            match page.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(objects)
    }

    async fn download_to(&self, key: &str, dest: &Path) -> Result<(), MirrorError> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MirrorError::Transfer(format!("Download failed for '{}': {}", key, e)))?;

        // Stream the body chunk by chunk so large objects never sit fully
        // in memory.
        let mut file = tokio::fs::File::create(dest).await?;
        let mut body = res.body;
        while let Some(chunk) = body.try_next().await.map_err(|e| {
            MirrorError::Transfer(format!("Body read failed for '{}': {}", key, e))
        })? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), MirrorError> {
        let body = ByteStream::from_path(path).await.map_err(|e| {
            MirrorError::Transfer(format!("Failed to open '{}': {}", path.display(), e))
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| MirrorError::Transfer(format!("Upload failed for '{}': {}", key, e)))?;

        Ok(())
    }
}
