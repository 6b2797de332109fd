use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Application, ApplicationId, ApplicationStatus, HistoryEntry, JobId, JobSeekerId};
use super::repository::{
    ApplicationStore, DocumentStore, JobStore, NotificationDispatcher, ProfileStore,
};
use super::service::{ApplicationLifecycleService, LifecycleError, SubmissionRequest};

/// Router builder exposing the lifecycle operations over HTTP.
pub fn application_router<J, P, D, A, N>(
    service: Arc<ApplicationLifecycleService<J, P, D, A, N>>,
) -> Router
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/applications",
            post(submit_handler::<J, P, D, A, N>),
        )
        .route(
            "/api/v1/jobs/applications/:application_id",
            get(status_handler::<J, P, D, A, N>),
        )
        .route(
            "/api/v1/jobs/applications/:application_id/transitions",
            post(transition_handler::<J, P, D, A, N>),
        )
        .route(
            "/api/v1/jobs/eligibility/:seeker_id/:job_id",
            get(eligibility_handler::<J, P, D, A, N>),
        )
        .route(
            "/api/v1/jobs/documents/expiration-sweep",
            post(sweep_handler::<J, P, D, A, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target_status: ApplicationStatus,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {
    #[serde(default)]
    pub horizon_days: Option<i64>,
}

/// Sanitized representation of an application's exposed state.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub seeker_id: JobSeekerId,
    pub status: &'static str,
    pub version: u64,
    pub history: Vec<HistoryEntry>,
}

impl ApplicationView {
    pub fn from_application(application: Application) -> Self {
        Self {
            application_id: application.id,
            job_id: application.job_id,
            seeker_id: application.seeker_id,
            status: application.status.label(),
            version: application.version,
            history: application.history,
        }
    }
}

pub(crate) async fn submit_handler<J, P, D, A, N>(
    State(service): State<Arc<ApplicationLifecycleService<J, P, D, A, N>>>,
    axum::Json(request): axum::Json<SubmissionRequest>,
) -> Response
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.submit_application(request, Utc::now()) {
        Ok(application) => {
            let view = ApplicationView::from_application(application);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<J, P, D, A, N>(
    State(service): State<Arc<ApplicationLifecycleService<J, P, D, A, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let id = ApplicationId(application_id);
    match service.application(&id) {
        Ok(application) => {
            let view = ApplicationView::from_application(application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn transition_handler<J, P, D, A, N>(
    State(service): State<Arc<ApplicationLifecycleService<J, P, D, A, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let id = ApplicationId(application_id);
    match service.advance_application(&id, request.target_status, request.note, Utc::now()) {
        Ok(application) => {
            let view = ApplicationView::from_application(application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<J, P, D, A, N>(
    State(service): State<Arc<ApplicationLifecycleService<J, P, D, A, N>>>,
    Path((seeker_id, job_id)): Path<(String, String)>,
) -> Response
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let seeker = JobSeekerId(seeker_id);
    let job = JobId(job_id);
    match service.check_eligibility(&seeker, &job, Utc::now()) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sweep_handler<J, P, D, A, N>(
    State(service): State<Arc<ApplicationLifecycleService<J, P, D, A, N>>>,
    axum::Json(request): axum::Json<SweepRequest>,
) -> Response
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    let horizon = request
        .horizon_days
        .unwrap_or(service.engine().config().expiry_horizon_days);

    match service.sweep_document_expirations(Utc::now(), horizon) {
        Ok(intents) => {
            let payload = json!({
                "horizon_days": horizon,
                "fired": intents,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: LifecycleError) -> Response {
    match error {
        LifecycleError::NotFound { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        LifecycleError::Ineligible(verdict) => {
            let payload = json!({
                "error": "job seeker does not meet the requirements for this job",
                "verdict": verdict,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        LifecycleError::Conflict | LifecycleError::VersionConflict => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        LifecycleError::InvalidTransition(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
