use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::availability::AvailabilityProvider;
use super::domain::{GarmentCategory, OrderRequest};
use super::outcome::{AllocationIssue, Recommendation};
use super::service::AllocationService;
use super::views::{RecommendationView, TeamPlanView};
use crate::workflows::catalog::CatalogSource;

/// Router builder exposing the recommendation and team endpoints.
pub fn allocation_router<C, A>(service: Arc<AllocationService<C, A>>) -> Router
where
    C: CatalogSource + 'static,
    A: AvailabilityProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/allocation/recommendations",
            post(recommend_handler::<C, A>),
        )
        .route("/api/v1/allocation/teams", post(team_handler::<C, A>))
        .with_state(service)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub category: GarmentCategory,
    pub quantity: u32,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRequest {
    #[serde(flatten)]
    pub order: AllocationRequest,
    /// Falls back to the service's configured cap when absent.
    #[serde(default)]
    pub per_person_cap: Option<NonZeroU32>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub recommendation: RecommendationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamPlanView>,
}

impl AllocationRequest {
    fn order(&self) -> Result<(OrderRequest, NaiveDate), Response> {
        let order = OrderRequest::new(self.category, self.quantity, self.deadline)
            .map_err(|error| unprocessable(error.to_string()))?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        Ok((order, today))
    }
}

pub(crate) async fn recommend_handler<C, A>(
    State(service): State<Arc<AllocationService<C, A>>>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response
where
    C: CatalogSource + 'static,
    A: AvailabilityProvider + 'static,
{
    let (order, today) = match request.order() {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let recommendation = service.recommend(&order, today);
    let view = RecommendationView::from_recommendation(&recommendation, request.limit);
    (status_for(&recommendation), axum::Json(view)).into_response()
}

pub(crate) async fn team_handler<C, A>(
    State(service): State<Arc<AllocationService<C, A>>>,
    axum::Json(request): axum::Json<TeamRequest>,
) -> Response
where
    C: CatalogSource + 'static,
    A: AvailabilityProvider + 'static,
{
    let (order, today) = match request.order.order() {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let per_person_cap = request
        .per_person_cap
        .unwrap_or_else(|| service.per_person_cap());
    let recommendation = service.recommend(&order, today);
    let team = recommendation
        .issue
        .is_none()
        .then(|| service.compose_team(&recommendation, per_person_cap))
        .map(|plan| TeamPlanView::from(&plan));

    let body = TeamResponse {
        recommendation: RecommendationView::from_recommendation(
            &recommendation,
            request.order.limit,
        ),
        team,
    };
    (status_for(&recommendation), axum::Json(body)).into_response()
}

fn status_for(recommendation: &Recommendation) -> StatusCode {
    match recommendation.issue {
        Some(AllocationIssue::DataUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

fn unprocessable(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
