use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::workflows::allocation::TailorId;

use super::domain::{AssignmentId, AssignmentStatus, ProjectId};
use super::repository::{AssignmentRepository, RepositoryError, RosterStatusStore};
use super::service::{AssignmentError, AssignmentService, NewProject};

/// Router builder exposing project intake, completion, assignment and payment endpoints.
pub fn assignment_router<R, S>(service: Arc<AssignmentService<R, S>>) -> Router
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    Router::new()
        .route("/api/v1/projects", post(project_handler::<R, S>))
        .route(
            "/api/v1/projects/:project_id/assignments",
            post(assign_handler::<R, S>).get(list_handler::<R, S>),
        )
        .route(
            "/api/v1/projects/:project_id/progress",
            get(progress_handler::<R, S>),
        )
        .route(
            "/api/v1/projects/:project_id/complete",
            post(complete_handler::<R, S>),
        )
        .route(
            "/api/v1/assignments/:assignment_id/status",
            post(status_handler::<R, S>),
        )
        .with_state(service)
}

/// Tailors are addressed by display name or by their normalized id; both resolve the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub tailor: String,
    pub pieces: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: AssignmentStatus,
}

pub(crate) async fn project_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    axum::Json(intake): axum::Json<NewProject>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    match service.register_project(intake) {
        Ok(project) => (StatusCode::CREATED, axum::Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assign_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    Path(project_id): Path<String>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    let project_id = ProjectId(project_id);
    let tailor_id = TailorId::from_name(&request.tailor);
    match service.assign(&project_id, &tailor_id, request.pieces) {
        Ok(assignment) => (StatusCode::CREATED, axum::Json(assignment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    match service.assignments(&ProjectId(project_id)) {
        Ok(assignments) => (StatusCode::OK, axum::Json(assignments)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    match service.progress(&ProjectId(project_id)) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    match service.complete_project(&ProjectId(project_id)) {
        Ok(project) => (StatusCode::OK, axum::Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<Arc<AssignmentService<R, S>>>,
    Path(assignment_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    match service.update_status(&AssignmentId(assignment_id), request.status) {
        Ok(assignment) => (StatusCode::OK, axum::Json(assignment)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssignmentError) -> Response {
    let status = match &error {
        AssignmentError::ProjectNotFound(_) | AssignmentError::AssignmentNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        AssignmentError::ProjectClosed(_)
        | AssignmentError::TailorBusy(_)
        | AssignmentError::OverCapacity { .. }
        | AssignmentError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssignmentError::ZeroPieces | AssignmentError::InvalidOrder(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssignmentError::Roster(_) | AssignmentError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AssignmentError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
    };

    let mut payload = json!({ "error": error.to_string() });
    if let AssignmentError::OverCapacity { remaining, .. } = error {
        payload["remaining"] = json!(remaining);
    }
    (status, axum::Json(payload)).into_response()
}
