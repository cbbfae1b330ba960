use super::CompletionNotifier;
use crate::modules::jobs::model::CompletionReport;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Reports finished jobs to the control plane with a bearer secret.
#[derive(Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    endpoint: Url,
    secret: String,
}

impl ControlPlaneClient {
    pub fn new(endpoint: Url, secret: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            endpoint,
            secret: secret.into(),
        })
    }
}

#[async_trait]
impl CompletionNotifier for ControlPlaneClient {
    async fn notify(&self, report: &CompletionReport) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.secret)
            .json(report)
            .send()
            .await
            .map_err(|e| anyhow!("Control plane request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Control plane responded {}: {}", status, body.trim()));
        }

        info!("📣 Control plane acknowledged {}", report.playback_url);
        Ok(())
    }
}
