//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use hls_transcoder::app::create_app;
use hls_transcoder::config::settings::AppConfig;
use hls_transcoder::infrastructure::callback::control_plane::ControlPlaneClient;
use hls_transcoder::infrastructure::callback::CompletionNotifier;
use hls_transcoder::infrastructure::storage::ObjectStore;
use hls_transcoder::state::AppState;
use hls_transcoder::workers::encoder::{EncodeOutcome, EncodeRequest, Encoder};
use hls_transcoder::workers::transcoder::{Transcoder, TranscoderSettings};
use http_body_util::BodyExt;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

pub const SOURCE_BUCKET: &str = "raw-videos";
pub const DESTINATION_BUCKET: &str = "hls-videos";
pub const CALLBACK_PATH: &str = "/api/videos/transcoded";
pub const SECRET: &str = "test-secret";

/// In-memory object store.
#[derive(Default)]
pub struct FakeStore {
    pub sources: Mutex<HashMap<(String, String), Bytes>>,
    pub puts: Mutex<BTreeMap<(String, String), Bytes>>,
    pub put_order: Mutex<Vec<String>>,
    pub fail_put_on: Mutex<Option<String>>,
    pub panic_on_download: bool,
    pub downloads: AtomicUsize,
}

impl FakeStore {
    pub fn with_source(filename: &str, body: &'static [u8]) -> Self {
        let store = Self::default();
        store.sources.lock().unwrap().insert(
            (SOURCE_BUCKET.to_string(), filename.to_string()),
            Bytes::from_static(body),
        );
        store
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().keys().map(|(_, k)| k.clone()).collect()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn download_to(&self, bucket: &str, key: &str, dest: &Path) -> anyhow::Result<u64> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_download {
            panic!("storage client blew up");
        }
        let body = self
            .sources
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchKey: {}/{}", bucket, key))?;
        tokio::fs::write(dest, &body).await?;
        Ok(body.len() as u64)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes, _content_type: &str) -> anyhow::Result<()> {
        if self.fail_put_on.lock().unwrap().as_deref() == Some(key) {
            return Err(anyhow!("simulated transient failure"));
        }
        self.put_order.lock().unwrap().push(key.to_string());
        self.puts
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

/// Stands in for ffmpeg: writes a playlist and two segments per rendition.
pub struct FakeEncoder {
    pub exit_code: Option<i32>,
    pub panic: bool,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<EncodeRequest>>,
}

impl FakeEncoder {
    pub fn exiting_with(exit_code: i32) -> Self {
        Self {
            exit_code: Some(exit_code),
            panic: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::exiting_with(0)
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::succeeding()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Encoder for FakeEncoder {
    fn run(&self, request: &EncodeRequest) -> io::Result<EncodeOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.panic {
            panic!("encoder crashed");
        }

        // Partial output before failing, like a real crash mid-encode.
        for profile in request.plan.profiles() {
            let dir = request.output_root.join(profile.dir_name());
            std::fs::write(dir.join("segment_000.ts"), b"ts0")?;
            if self.exit_code == Some(0) {
                std::fs::write(dir.join("segment_001.ts"), b"ts1")?;
                std::fs::write(
                    dir.join("index.m3u8"),
                    "#EXTM3U\n#EXT-X-PLAYLIST-TYPE:VOD\n#EXT-X-TARGETDURATION:6\n#EXT-X-ENDLIST\n",
                )?;
            }
        }

        Ok(EncodeOutcome {
            exit_code: self.exit_code,
            stdout: String::new(),
            stderr: "frame=  100 fps=50\n".to_string(),
        })
    }
}

pub struct Harness {
    pub app: Router,
    pub store: Arc<FakeStore>,
    pub encoder: Arc<FakeEncoder>,
    pub workspace_root: TempDir,
}

pub fn test_config(callback: Url, workspace_root: &Path) -> AppConfig {
    AppConfig {
        server_port: 0,
        s3_endpoint: "http://127.0.0.1:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_access_key: "minio".to_string(),
        s3_secret_key: "minio123".to_string(),
        source_bucket: SOURCE_BUCKET.to_string(),
        destination_bucket: DESTINATION_BUCKET.to_string(),
        control_plane_url: callback,
        control_plane_secret: SECRET.to_string(),
        control_plane_timeout_secs: 5,
        workspace_root: workspace_root.to_path_buf(),
        ffmpeg_path: "ffmpeg".to_string(),
        hls_segment_seconds: 6,
        max_trigger_bytes: 64 * 1024,
    }
}

pub fn harness(store: FakeStore, encoder: FakeEncoder, control_plane_uri: &str) -> Harness {
    let dir = TempDir::new().unwrap();
    let workspace_root = dir.path().to_path_buf();
    let notifier = ControlPlaneClient::new(callback_url(control_plane_uri), SECRET, Duration::from_secs(5)).unwrap();
    harness_in(dir, workspace_root, store, encoder, Arc::new(notifier))
}

pub fn callback_url(control_plane_uri: &str) -> Url {
    Url::parse(&format!("{}{}", control_plane_uri, CALLBACK_PATH)).unwrap()
}

/// Builds the app with jobs allocating workspaces under `workspace_root`.
/// `dir` owns the temporary tree and lives as long as the harness.
pub fn harness_in(
    dir: TempDir,
    workspace_root: PathBuf,
    store: FakeStore,
    encoder: FakeEncoder,
    notifier: Arc<dyn CompletionNotifier>,
) -> Harness {
    let config = test_config(callback_url("http://127.0.0.1:1"), &workspace_root);

    let store = Arc::new(store);
    let encoder = Arc::new(encoder);

    let transcoder = Transcoder::new(
        store.clone(),
        encoder.clone(),
        notifier,
        TranscoderSettings {
            destination_bucket: DESTINATION_BUCKET.to_string(),
            workspace_root,
            segment_seconds: 6,
        },
    );

    Harness {
        app: create_app(AppState::new(config, transcoder)),
        store,
        encoder,
        workspace_root: dir,
    }
}

pub fn push_request(payload: &str) -> Request<Body> {
    let envelope = serde_json::json!({
        "message": {
            "data": STANDARD.encode(payload),
            "messageId": "1234567890",
            "publishTime": "2024-01-01T00:00:00Z"
        },
        "subscription": "projects/demo/subscriptions/transcode"
    });
    Request::post("/")
        .header("content-type", "application/json")
        .body(Body::from(envelope.to_string()))
        .unwrap()
}

pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Entries left under the workspace root.
pub fn leftover_workspaces(root: &Path) -> usize {
    std::fs::read_dir(root).unwrap().count()
}
