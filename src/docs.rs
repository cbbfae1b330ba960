use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::jobs::handler::handle_push,
        crate::modules::jobs::handler::health,
    ),
    components(
        schemas(
            crate::modules::jobs::dto::PushEnvelope,
            crate::modules::jobs::dto::PushMessage,
            crate::modules::jobs::dto::JobResponse,
            crate::modules::jobs::model::CompletionReport,
            crate::modules::jobs::model::JobStatus,
        )
    ),
    tags(
        (name = "Jobs", description = "HLS transcoding job intake"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
