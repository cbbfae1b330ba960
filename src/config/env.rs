use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    S3Endpoint,
    S3Region,
    S3AccessKey,
    S3SecretKey,
    SourceBucket,
    DestinationBucket,
    ControlPlaneUrl,
    ControlPlaneSecret,
    ControlPlaneTimeoutSecs,
    WorkspaceRoot,
    FfmpegPath,
    HlsSegmentSeconds,
    MaxTriggerBytes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::SourceBucket => "SOURCE_BUCKET",
            EnvKey::DestinationBucket => "DESTINATION_BUCKET",
            EnvKey::ControlPlaneUrl => "CONTROL_PLANE_URL",
            EnvKey::ControlPlaneSecret => "CONTROL_PLANE_SECRET",
            EnvKey::ControlPlaneTimeoutSecs => "CONTROL_PLANE_TIMEOUT_SECS",
            EnvKey::WorkspaceRoot => "WORKSPACE_ROOT",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::HlsSegmentSeconds => "HLS_SEGMENT_SECONDS",
            EnvKey::MaxTriggerBytes => "MAX_TRIGGER_BYTES",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
