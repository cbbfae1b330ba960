pub mod control_plane;

use crate::modules::jobs::model::CompletionReport;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify(&self, report: &CompletionReport) -> Result<()>;
}
