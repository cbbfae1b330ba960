use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

// --- PUSH DELIVERY ---

/// Envelope posted by the push subscription.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded JSON job payload.
    pub data: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Decoded content of `message.data`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "filename is required"))]
    pub filename: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "qualityCeiling must be a positive integer"))]
    pub quality_ceiling: u32,
    /// Source bucket; the configured default is used when absent.
    #[serde(default)]
    pub bucket: Option<String>,
}

// --- RESPONSES ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub filename: String,
    pub playback_url: String,
}
