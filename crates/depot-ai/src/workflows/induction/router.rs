use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::learning::ActualOutcomes;
use super::repository::{RepositoryError, RunRepository, SensorFeed};
use super::service::{InductionPlanner, PlanRequest, PlanningError};
use super::weights::ScenarioPreset;

/// Router builder exposing HTTP endpoints for planning, simulation, and
/// the learning feedback loop.
pub fn induction_router<R, S>(planner: Arc<InductionPlanner<R, S>>) -> Router
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    Router::new()
        .route("/api/v1/induction/optimize", post(optimize_handler::<R, S>))
        .route("/api/v1/induction/simulate", post(simulate_handler::<R, S>))
        .route("/api/v1/induction/outcomes", post(outcomes_handler::<R, S>))
        .route(
            "/api/v1/induction/weights/:scenario",
            get(scenario_weights_handler::<R, S>),
        )
        .route(
            "/api/v1/induction/runs/latest",
            get(latest_run_handler::<R, S>),
        )
        .route(
            "/api/v1/induction/insights",
            get(insights_handler::<R, S>),
        )
        .with_state(planner)
}

pub(crate) async fn optimize_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
    axum::Json(request): axum::Json<PlanRequest>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    plan_response(planner.plan(&request, false))
}

pub(crate) async fn simulate_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
    axum::Json(request): axum::Json<PlanRequest>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    plan_response(planner.plan(&request, true))
}

fn plan_response(
    result: Result<super::service::PlanOutcome, PlanningError>,
) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(PlanningError::Optimization(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn outcomes_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
    axum::Json(outcomes): axum::Json<ActualOutcomes>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    match planner.record_outcomes(outcomes) {
        Ok(weights) => {
            let payload = json!({
                "weights": weights,
                "actual_outcomes": outcomes,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn scenario_weights_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
    Path(scenario): Path<String>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    if scenario != "default" && ScenarioPreset::from_id(&scenario).is_none() {
        let payload = json!({ "error": format!("unknown scenario '{scenario}'") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    }

    let weights = planner.resolve_weights(Some(&scenario));
    let payload = json!({
        "scenario": scenario,
        "weights": weights,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn latest_run_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    match planner.latest_run() {
        Ok(Some(run)) => (StatusCode::OK, axum::Json(run)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no optimization runs recorded" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(PlanningError::Repository(RepositoryError::Unavailable(reason))) => {
            let payload = json!({ "error": format!("run store unavailable: {reason}") });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn insights_handler<R, S>(
    State(planner): State<Arc<InductionPlanner<R, S>>>,
) -> Response
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    match planner.insights() {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
