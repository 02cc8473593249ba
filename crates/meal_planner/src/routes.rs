//! HTTP routes for the web UI.

use std::sync::Arc;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use spoonacular_client::{RandomRecipes, RecipeDetail, RecipeError, SearchOptions, SearchResults};
use tokio::sync::watch;

use crate::MealPlanService;
use crate::domains::macros::{Macro, MacroSplit};
use crate::domains::persistence::SavePlan;
use crate::error::PlannerError;
use crate::store::{StoreError, StoredDiet};
use crate::types::{DayPlan, PlanRequest, WeekPlan, Weekday};

pub struct AppState {
    pub service: MealPlanService,
    pub metrics: PrometheusHandle,
    /// Flips to `true` when the server starts shutting down; running
    /// generations stop before their next recipe search.
    pub shutdown: watch::Receiver<bool>,
}

#[derive(Serialize)]
struct ConfigStatus {
    configured: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub max_calories: Option<u32>,
    pub min_protein: Option<u32>,
    pub number: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub number: Option<u32>,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    #[serde(default)]
    pub split: MacroSplit,
    pub which: Macro,
    pub value: u32,
}

#[derive(Serialize)]
struct AdjustResponse {
    split: MacroSplit,
    valid: bool,
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
async fn config_status(State(state): State<Arc<AppState>>) -> Json<ConfigStatus> {
    Json(ConfigStatus {
        configured: state.service.is_configured(),
    })
}

#[debug_handler]
async fn provider_day(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<DayPlan>, (StatusCode, String)> {
    state
        .service
        .generate_provider_day(&req)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn rule_day(
    State(state): State<Arc<AppState>>,
    Path(weekday): Path<String>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<DayPlan>, (StatusCode, String)> {
    let weekday: Weekday = weekday.parse().map_err(map_err)?;
    state
        .service
        .generate_day(weekday, &req, &state.shutdown)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn week(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<WeekPlan>, (StatusCode, String)> {
    state
        .service
        .generate_week(&req, &state.shutdown)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn recipe_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<RecipeDetail>, (StatusCode, String)> {
    state
        .service
        .recipe_detail(id)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<SearchResults>, (StatusCode, String)> {
    let options = SearchOptions {
        diet: q.diet,
        cuisine: q.cuisine,
        max_calories: q.max_calories,
        min_protein: q.min_protein,
        number: q.number,
    };
    state
        .service
        .search(&q.query, &options)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn random(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RandomQuery>,
) -> Result<Json<RandomRecipes>, (StatusCode, String)> {
    state
        .service
        .random(q.number.unwrap_or(1), q.tags.as_deref())
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn adjust_macros(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdjustRequest>,
) -> Json<AdjustResponse> {
    let split = state.service.adjust_macros(req.split, req.which, req.value);
    Json(AdjustResponse {
        valid: split.is_valid(),
        split,
    })
}

#[debug_handler]
async fn save_diet(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    Json(req): Json<SavePlan>,
) -> Result<(StatusCode, Json<StoredDiet>), (StatusCode, String)> {
    state
        .service
        .save_plan(&patient_id, &req)
        .await
        .map(|d| (StatusCode::CREATED, Json(d)))
        .map_err(map_err)
}

#[debug_handler]
async fn list_diets(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<StoredDiet>>, (StatusCode, String)> {
    state
        .service
        .list_diets(&patient_id)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn delete_diet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .service
        .delete_diet(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(map_err)
}

pub fn status_for(e: &PlannerError) -> StatusCode {
    match e {
        PlannerError::Recipe(RecipeError::NotConfigured(_)) => StatusCode::PRECONDITION_FAILED,
        PlannerError::Recipe(RecipeError::RateLimitExceeded(_)) => StatusCode::TOO_MANY_REQUESTS,
        PlannerError::Recipe(RecipeError::ServiceUnavailable(_)) => StatusCode::BAD_GATEWAY,
        PlannerError::Validation(_) => StatusCode::BAD_REQUEST,
        PlannerError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        PlannerError::Store(_) => StatusCode::BAD_GATEWAY,
        PlannerError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn map_err(e: PlannerError) -> (StatusCode, String) {
    let status = status_for(&e);
    if status.is_server_error() {
        tracing::warn!(error = %e, "request failed");
    }
    (status, e.user_message())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/config/status", get(config_status))
        .route("/plans/day", post(provider_day))
        .route("/plans/day/{weekday}", post(rule_day))
        .route("/plans/week", post(week))
        .route("/recipes/search", get(search))
        .route("/recipes/random", get(random))
        .route("/recipes/{id}", get(recipe_detail))
        .route("/macros/adjust", post(adjust_macros))
        .route("/patients/{id}/diets", post(save_diet).get(list_diets))
        .route("/diets/{id}", axum::routing::delete(delete_diet))
        .with_state(state)
}
