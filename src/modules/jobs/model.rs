use serde::Serialize;
use std::path::Path;
use utoipa::ToSchema;

/// One transcoding request, fixed for the lifetime of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source_bucket: String,
    pub filename: String,
    pub quality_ceiling: u32,
}

impl Job {
    /// Filename without directories or extension, e.g. `videos/lecture1.mp4` -> `lecture1`.
    pub fn basename(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.filename.replace('/', "_"))
    }

    /// Destination key prefix. Depends on the filename only, so redelivery
    /// of the same job overwrites the same keys.
    pub fn destination_prefix(&self) -> String {
        format!("transcoded/{}", self.basename())
    }

    /// Playback path of the master manifest, relative to the destination bucket.
    pub fn playback_path(&self) -> String {
        format!("/{}/{}", self.destination_prefix(), crate::workers::manifest::MASTER_MANIFEST)
    }
}

/// Status values of the completion callback.
///
/// The worker itself only reports `Ready`; a failed job sends no callback and
/// is retried by redelivery. `Failed` is kept as a wire value the control
/// plane accepts for this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub playback_url: String,
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(filename: &str) -> Job {
        Job {
            source_bucket: "raw".to_string(),
            filename: filename.to_string(),
            quality_ceiling: 720,
        }
    }

    #[test]
    fn test_prefix_strips_extension_and_directories() {
        assert_eq!(job("lecture1.mp4").destination_prefix(), "transcoded/lecture1");
        assert_eq!(job("uploads/2024/lecture1.mov").destination_prefix(), "transcoded/lecture1");
        assert_eq!(job("noext").destination_prefix(), "transcoded/noext");
    }

    #[test]
    fn test_playback_path() {
        assert_eq!(job("lecture1.mp4").playback_path(), "/transcoded/lecture1/master.m3u8");
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(serde_json::to_value(JobStatus::Ready).unwrap(), "ready");
        assert_eq!(serde_json::to_value(JobStatus::Failed).unwrap(), "failed");
    }

    #[test]
    fn test_completion_report_wire_format() {
        let report = CompletionReport {
            playback_url: "/transcoded/lecture1/master.m3u8".to_string(),
            status: JobStatus::Ready,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "playbackUrl": "/transcoded/lecture1/master.m3u8",
                "status": "ready"
            })
        );
    }
}
