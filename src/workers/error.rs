use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),

    #[error("failed to prepare workspace: {0}")]
    Workspace(#[from] std::io::Error),

    #[error("quality ceiling {0} is below every rendition profile")]
    EmptyPlan(u32),

    #[error("failed to fetch source object: {0:#}")]
    Fetch(#[source] anyhow::Error),

    #[error("failed to start encoder: {0}")]
    EncoderSpawn(#[source] std::io::Error),

    #[error("encoder exited with {}", describe_exit(.code))]
    Encode { code: Option<i32> },

    #[error("failed to write master manifest: {0}")]
    Manifest(#[source] std::io::Error),

    #[error("failed to publish {key}: {source:#}")]
    Publish {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to notify control plane: {0:#}")]
    Notify(#[source] anyhow::Error),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

impl JobError {
    /// Client-class errors are not worth redelivering.
    pub fn is_client_error(&self) -> bool {
        matches!(self, JobError::InvalidTrigger(_))
    }
}
