use crate::config::settings::AppConfig;
use crate::workers::transcoder::Transcoder;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub transcoder: Arc<Transcoder>,
}

impl AppState {
    pub fn new(config: AppConfig, transcoder: Transcoder) -> Self {
        Self {
            config: Arc::new(config),
            transcoder: Arc::new(transcoder),
        }
    }
}
