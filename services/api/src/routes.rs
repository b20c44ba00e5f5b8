use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use garment_coop::workflows::allocation::{
    allocation_router, AllocationService, AvailabilityProvider,
};
use garment_coop::workflows::assignments::{
    assignment_router, AssignmentRepository, AssignmentService, RosterStatusStore,
};
use garment_coop::workflows::catalog::CatalogSource;
use serde_json::json;
use std::sync::Arc;

/// Allocation and ledger routers plus the operational endpoints.
pub(crate) fn with_service_routes<C, A, R, S>(
    allocation: Arc<AllocationService<C, A>>,
    assignments: Arc<AssignmentService<R, S>>,
) -> axum::Router
where
    C: CatalogSource + 'static,
    A: AvailabilityProvider + 'static,
    R: AssignmentRepository + 'static,
    S: RosterStatusStore + 'static,
{
    allocation_router(allocation)
        .merge(assignment_router(assignments))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound and the skill catalog file is reachable.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let bound = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let catalog_present = state.catalog_path.is_file();

    let (status, label) = match (bound, catalog_present) {
        (true, true) => (StatusCode::OK, "ready"),
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "initializing"),
        (true, false) => (StatusCode::SERVICE_UNAVAILABLE, "catalog_missing"),
    };

    let payload = json!({
        "status": label,
        "catalog_path": state.catalog_path.display().to_string(),
    });
    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
