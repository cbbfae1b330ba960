use super::ObjectStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::BehaviorVersion, config::Credentials, config::Region, Client};
use bytes::Bytes;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("✅ S3 client configured for {}", endpoint);

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn download_to(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow!("GetObject {}/{} failed: {}", bucket, key, e.into_service_error()))?;

        let mut reader = resp.body.into_async_read();
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", dest.display(), e))?;

        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| anyhow!("Failed to stream {}/{} to disk: {}", bucket, key, e))?;
        file.flush().await?;

        debug!("Downloaded {} bytes from {}/{}", written, bucket, key);
        Ok(written)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow!("PutObject {}/{} failed: {}", bucket, key, e.into_service_error()))?;

        Ok(())
    }
}
