use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid control plane url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub source_bucket: String,
    pub destination_bucket: String,
    pub control_plane_url: Url,
    pub control_plane_secret: String,
    pub control_plane_timeout_secs: u64,
    pub workspace_root: PathBuf,
    pub ffmpeg_path: String,
    pub hls_segment_seconds: u32,
    pub max_trigger_bytes: usize,
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get(key).map_err(|_| ConfigError::Missing(name))
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let raw_url = required(EnvKey::ControlPlaneUrl)?;
        let control_plane_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            url: raw_url.clone(),
            source,
        })?;

        let workspace_root = match env::get(EnvKey::WorkspaceRoot) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::temp_dir(),
        };

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 8080),
            s3_endpoint: required(EnvKey::S3Endpoint)?,
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_access_key: required(EnvKey::S3AccessKey)?,
            s3_secret_key: required(EnvKey::S3SecretKey)?,
            source_bucket: required(EnvKey::SourceBucket)?,
            destination_bucket: required(EnvKey::DestinationBucket)?,
            control_plane_url,
            control_plane_secret: required(EnvKey::ControlPlaneSecret)?,
            control_plane_timeout_secs: env::get_parsed(EnvKey::ControlPlaneTimeoutSecs, 30),
            workspace_root,
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            hls_segment_seconds: env::get_parsed(EnvKey::HlsSegmentSeconds, 6),
            max_trigger_bytes: env::get_parsed(EnvKey::MaxTriggerBytes, 1024 * 1024),
        })
    }
}
