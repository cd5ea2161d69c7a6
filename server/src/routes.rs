//! API routes for the chorus job service

use crate::dto::{ErrorBody, RunJobRequest, RunJobResponse};
use crate::server::AppState;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chorus_application::{RunJobError, RunJobInput, RunJobUseCase};
use chorus_domain::{ModelId, Prompt};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

pub fn job_routes() -> Router<AppStateArc> {
    Router::new().route("/run", post(run_job))
}

/// `POST /run`: validate the request, run the job, serialize the outcome.
///
/// A job either fully succeeds or fully fails; there are no partial-success
/// responses.
async fn run_job(
    State(state): State<AppStateArc>,
    payload: Result<Json<RunJobRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(_) => return bad_request("Invalid JSON body"),
    };

    let Some(prompt) = request.prompt.and_then(Prompt::try_new) else {
        return bad_request("prompt is required and must be a string");
    };
    let models = request.models.unwrap_or_default();
    if models.is_empty() {
        return bad_request("models must be a non-empty array");
    }

    let models: Vec<ModelId> = models.into_iter().map(ModelId::new).collect();
    let strategy = request.strategy.unwrap_or(state.default_strategy);

    info!(%strategy, models = models.len(), "Received job request");

    let input = RunJobInput::new(prompt, models).with_strategy(strategy);
    let use_case = RunJobUseCase::new(Arc::clone(&state.invoker));

    match use_case.execute(input).await {
        Ok(job) => (StatusCode::OK, Json(RunJobResponse::from(job))).into_response(),
        Err(job_error) => {
            error!(error = %job_error, "Job failed");
            let kind = match &job_error {
                RunJobError::ModelFailed { .. } => "JobError",
                RunJobError::TaskLost(_) => "InternalError",
            };
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                kind,
                job_error.to_string(),
            )
        }
    }
}

/// JSON 404 for any route the service does not expose.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "NotFound", "Not found")
}

fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "BadRequest", message)
}

fn error_response(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(kind, message))).into_response()
}
