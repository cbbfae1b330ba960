use crate::infrastructure::callback::CompletionNotifier;
use crate::infrastructure::storage::ObjectStore;
use crate::modules::jobs::model::{CompletionReport, Job, JobStatus};
use crate::workers::encoder::{EncodeRequest, Encoder};
use crate::workers::error::JobError;
use crate::workers::manifest;
use crate::workers::planner::{plan_renditions, RenditionPlan, CATALOG};
use crate::workers::publisher;
use crate::workers::workspace::Workspace;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info};

/// Encoder stderr lines kept in the failure log.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct TranscoderSettings {
    pub destination_bucket: String,
    pub workspace_root: PathBuf,
    pub segment_seconds: u32,
}

/// Runs one job end to end: fetch, plan, encode, write the master manifest,
/// publish, notify. Shared across requests; holds no per-job state.
pub struct Transcoder {
    store: Arc<dyn ObjectStore>,
    encoder: Arc<dyn Encoder>,
    notifier: Arc<dyn CompletionNotifier>,
    settings: TranscoderSettings,
}

impl Transcoder {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        encoder: Arc<dyn Encoder>,
        notifier: Arc<dyn CompletionNotifier>,
        settings: TranscoderSettings,
    ) -> Self {
        Self {
            store,
            encoder,
            notifier,
            settings,
        }
    }

    /// Processes `job` inside a fresh workspace that is removed on every exit
    /// path, including a panic in one of the stages.
    pub async fn process_job(&self, job: &Job) -> Result<CompletionReport, JobError> {
        let workspace =
            Workspace::create(&self.settings.workspace_root, &job.filename, OffsetDateTime::now_utc())
                .await?;

        let result = AssertUnwindSafe(self.run_stages(job, &workspace))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(JobError::Unexpected(panic_message(panic))));

        workspace.release().await;
        result
    }

    async fn run_stages(&self, job: &Job, workspace: &Workspace) -> Result<CompletionReport, JobError> {
        self.fetch_source(job, workspace).await?;

        let plan = plan_renditions(&CATALOG, job.quality_ceiling)
            .ok_or(JobError::EmptyPlan(job.quality_ceiling))?;
        info!("📋 Planned renditions {:?}", plan.labels());

        self.encode(workspace, &plan).await?;

        manifest::write_master(&workspace.output_root(), &plan)
            .await
            .map_err(JobError::Manifest)?;

        let prefix = job.destination_prefix();
        publisher::publish_tree(
            self.store.as_ref(),
            &self.settings.destination_bucket,
            &workspace.output_root(),
            &prefix,
        )
        .await?;

        let report = CompletionReport {
            playback_url: job.playback_path(),
            status: JobStatus::Ready,
        };
        self.notifier.notify(&report).await.map_err(JobError::Notify)?;

        Ok(report)
    }

    async fn fetch_source(&self, job: &Job, workspace: &Workspace) -> Result<(), JobError> {
        info!("⬇️ Downloading {}/{}", job.source_bucket, job.filename);
        let bytes = self
            .store
            .download_to(&job.source_bucket, &job.filename, &workspace.input_path())
            .await
            .map_err(JobError::Fetch)?;
        info!("⬇️ Downloaded {} bytes", bytes);
        Ok(())
    }

    async fn encode(&self, workspace: &Workspace, plan: &RenditionPlan) -> Result<(), JobError> {
        workspace.create_rendition_dirs(plan).await?;

        let request = EncodeRequest {
            input: workspace.input_path(),
            output_root: workspace.output_root(),
            plan: plan.clone(),
            segment_seconds: self.settings.segment_seconds,
        };
        let encoder = Arc::clone(&self.encoder);

        let outcome = tokio::task::spawn_blocking(move || encoder.run(&request))
            .await
            .map_err(|e| JobError::Unexpected(format!("encoder task failed: {}", e)))?
            .map_err(JobError::EncoderSpawn)?;

        debug!("Encoder stdout:\n{}", outcome.stdout);
        if !outcome.success() {
            error!(
                "❌ Encoder exited with {:?}; last output:\n{}",
                outcome.exit_code,
                tail(&outcome.stderr, STDERR_TAIL_LINES)
            );
            return Err(JobError::Encode {
                code: outcome.exit_code,
            });
        }
        debug!("Encoder stderr:\n{}", outcome.stderr);

        info!("🎬 Encoded {} renditions", plan.len());
        Ok(())
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "stage panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc\nd", 2), "c\nd");
        assert_eq!(tail("a\nb", 5), "a\nb");
        assert_eq!(tail("", 3), "");
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42)), "stage panicked");
    }
}
