pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Object storage as seen by the pipeline.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Streams `bucket/key` into `dest`, returning the number of bytes written.
    async fn download_to(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;

    /// Writes `body` to `bucket/key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()>;
}
