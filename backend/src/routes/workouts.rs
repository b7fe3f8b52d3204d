//! Workout routes
//!
//! All handlers act on behalf of the authenticated user only.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::workout::WORKOUT_NOT_FOUND;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use workout_tracker_shared::{
    CreateWorkoutRequest, Page, PageQuery, UpdateWorkoutRequest, WorkoutResponse,
};

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/:id", patch(update_workout).delete(delete_workout))
}

/// Non-numeric ids cannot name a workout
fn workout_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(WORKOUT_NOT_FOUND.to_string()))
}

/// GET /api/workouts?page=1&per_page=5
async fn list_workouts(
    State(state): State<AppState>,
    auth_user: AuthUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Page<WorkoutResponse>>> {
    let Query(query) = query?;
    let limits = &state.config().pagination;
    let pagination = query.normalize(limits.default_per_page, limits.max_per_page);

    let page = WorkoutService::list(state.db(), auth_user.user_id, pagination).await?;
    Ok(Json(page))
}

/// POST /api/workouts
async fn create_workout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<Json<CreateWorkoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkoutResponse>)> {
    let Json(req) = body?;
    let workout = WorkoutService::create(state.db(), auth_user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// PATCH /api/workouts/:id
async fn update_workout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> ApiResult<Json<WorkoutResponse>> {
    let id = workout_id(path)?;
    let Json(patch) = body?;
    let workout = WorkoutService::update(state.db(), auth_user.user_id, id, patch).await?;
    Ok(Json(workout))
}

/// DELETE /api/workouts/:id
async fn delete_workout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = workout_id(path)?;
    WorkoutService::delete(state.db(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
