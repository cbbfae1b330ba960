use super::dto::{JobPayload, JobResponse, PushEnvelope};
use super::model::Job;
use crate::state::AppState;
use crate::workers::error::JobError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;
use validator::Validate;

pub struct JobService;

impl JobService {
    /// Turns a push envelope into a [`Job`]. Every failure here is a client
    /// error and happens before any workspace exists.
    pub fn decode(envelope: &PushEnvelope, default_bucket: &str) -> Result<Job, JobError> {
        let raw = STANDARD
            .decode(envelope.message.data.trim())
            .map_err(|e| JobError::InvalidTrigger(format!("message data is not base64: {}", e)))?;

        let payload: JobPayload = serde_json::from_slice(&raw)
            .map_err(|e| JobError::InvalidTrigger(format!("message data is not a job payload: {}", e)))?;

        payload
            .validate()
            .map_err(|e| JobError::InvalidTrigger(e.to_string()))?;

        let source_bucket = payload
            .bucket
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| default_bucket.to_string());

        Ok(Job {
            source_bucket,
            filename: payload.filename,
            quality_ceiling: payload.quality_ceiling,
        })
    }

    pub async fn dispatch(state: &AppState, job: Job, message_id: Option<&str>) -> Result<JobResponse, JobError> {
        let span = info_span!(
            "job",
            job_id = %Uuid::new_v4(),
            message_id = message_id.unwrap_or("-"),
            filename = %job.filename,
        );

        async {
            info!("📦 Received transcoding job (ceiling {})", job.quality_ceiling);
            let report = state.transcoder.process_job(&job).await?;
            info!("✅ Job completed, playback at {}", report.playback_url);

            Ok::<_, JobError>(JobResponse {
                filename: job.filename.clone(),
                playback_url: report.playback_url,
            })
        }
        .instrument(span)
        .await
    }
}
