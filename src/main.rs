use dotenvy::dotenv;
use hls_transcoder::app;
use hls_transcoder::config::settings::AppConfig;
use hls_transcoder::infrastructure::callback::control_plane::ControlPlaneClient;
use hls_transcoder::infrastructure::storage::s3::StorageService;
use hls_transcoder::state::AppState;
use hls_transcoder::workers::encoder::FfmpegEncoder;
use hls_transcoder::workers::transcoder::{Transcoder, TranscoderSettings};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting transcoder...");

    let config = AppConfig::new()?;

    let storage = StorageService::new(
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_access_key,
        &config.s3_secret_key,
    );
    let notifier = ControlPlaneClient::new(
        config.control_plane_url.clone(),
        config.control_plane_secret.clone(),
        Duration::from_secs(config.control_plane_timeout_secs),
    )?;
    let encoder = FfmpegEncoder::new(config.ffmpeg_path.clone());

    let transcoder = Transcoder::new(
        Arc::new(storage),
        Arc::new(encoder),
        Arc::new(notifier),
        TranscoderSettings {
            destination_bucket: config.destination_bucket.clone(),
            workspace_root: config.workspace_root.clone(),
            segment_seconds: config.hls_segment_seconds,
        },
    );

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(config, transcoder);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🎥 Transcoder listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
