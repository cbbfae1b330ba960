use super::dto::{JobResponse, PushEnvelope};
use super::service::JobService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, warn};

/// Run one transcoding job from a push delivery
///
/// 400 tells the delivery layer not to retry; 500 asks for redelivery.
#[utoipa::path(
    post,
    path = "/",
    request_body = PushEnvelope,
    responses(
        (status = 200, description = "Job transcoded and published", body = ApiResponse<JobResponse>),
        (status = 400, description = "Malformed trigger"),
        (status = 500, description = "Pipeline failure, redeliver")
    ),
    tag = "Jobs"
)]
pub async fn handle_push(
    State(state): State<AppState>,
    payload: Result<Json<PushEnvelope>, JsonRejection>,
) -> impl IntoResponse {
    let Json(envelope) = match payload {
        Ok(p) => p,
        Err(e) => {
            warn!("Rejected push envelope: {}", e.body_text());
            return ApiError::bad_request(format!("Invalid push envelope: {}", e.body_text())).into_response();
        }
    };

    let job = match JobService::decode(&envelope, &state.config.source_bucket) {
        Ok(job) => job,
        Err(e) => {
            warn!("Rejected trigger: {}", e);
            return ApiError::bad_request(e.to_string()).into_response();
        }
    };

    let filename = job.filename.clone();
    match JobService::dispatch(&state, job, envelope.message.message_id.as_deref()).await {
        Ok(result) => ApiSuccess(
            ApiResponse::success(result, &format!("Transcoded {} successfully", filename)),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => {
            error!("❌ Failed to process {}: {}", filename, e);
            ApiError::internal(format!("Failed to transcode {}: {}", filename, e)).into_response()
        }
    }
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is alive", body = String)
    ),
    tag = "Health"
)]
pub async fn health() -> &'static str {
    "ok"
}
