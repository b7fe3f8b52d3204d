//! Workout service: owner-scoped listing and ownership-checked writes

use crate::db::{self, Violation};
use crate::error::ApiError;
use crate::repositories::{WorkoutRecord, WorkoutRepository};
use sqlx::PgPool;
use tracing::info;
use workout_tracker_shared::{
    CreateWorkoutRequest, Page, Pagination, UpdateWorkoutRequest, WorkoutDraft, WorkoutResponse,
};

pub const WORKOUT_NOT_FOUND: &str = "Workout not found";
pub const NOT_OWNER: &str = "You do not have permission to modify this workout";
pub const OWNER_MISSING: &str = "Workout owner no longer exists";
pub const CONSTRAINT_FAILED: &str = "Workout data violates a store constraint";

/// Constraint failures on a workout write are the client's to fix
fn write_error(err: anyhow::Error) -> ApiError {
    match db::violation(&err) {
        Some(Violation::ForeignKey) => ApiError::validation(OWNER_MISSING),
        Some(Violation::Check) => ApiError::validation(CONSTRAINT_FAILED),
        _ => ApiError::Internal(err),
    }
}

/// Reject access to a workout owned by someone else
pub fn ensure_owner(workout: &WorkoutRecord, user_id: i64) -> Result<(), ApiError> {
    if workout.user_id == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(NOT_OWNER.to_string()))
    }
}

/// Workout service
pub struct WorkoutService;

impl WorkoutService {
    /// One page of the user's own workouts
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<WorkoutResponse>, ApiError> {
        let total = WorkoutRepository::count_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let items = WorkoutRepository::list_for_user(
            pool,
            user_id,
            pagination.per_page,
            pagination.offset(),
        )
        .await
        .map_err(ApiError::Internal)?
        .into_iter()
        .map(WorkoutResponse::from)
        .collect();

        Ok(Page::new(pagination, total, items))
    }

    /// Create a workout owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        req: CreateWorkoutRequest,
    ) -> Result<WorkoutResponse, ApiError> {
        let draft = WorkoutDraft::from(req);
        draft.check()?;

        let mut tx = pool.begin().await?;
        let workout = WorkoutRepository::create(&mut *tx, user_id, &draft)
            .await
            .map_err(write_error)?;
        tx.commit().await?;

        info!(user_id, workout_id = workout.id, "Workout created");

        Ok(workout.into())
    }

    /// Apply a partial update to a workout the user owns
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        workout_id: i64,
        patch: UpdateWorkoutRequest,
    ) -> Result<WorkoutResponse, ApiError> {
        let mut tx = pool.begin().await?;

        let existing = WorkoutRepository::find_by_id_for_update(&mut *tx, workout_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(WORKOUT_NOT_FOUND.to_string()))?;
        ensure_owner(&existing, user_id)?;

        let mut draft = existing.draft();
        draft.apply(patch);
        draft.check()?;

        let workout = WorkoutRepository::update(&mut *tx, workout_id, &draft)
            .await
            .map_err(write_error)?;
        tx.commit().await?;

        info!(user_id, workout_id, "Workout updated");

        Ok(workout.into())
    }

    /// Delete a workout the user owns
    pub async fn delete(pool: &PgPool, user_id: i64, workout_id: i64) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;

        let existing = WorkoutRepository::find_by_id_for_update(&mut *tx, workout_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(WORKOUT_NOT_FOUND.to_string()))?;
        ensure_owner(&existing, user_id)?;

        WorkoutRepository::delete(&mut *tx, workout_id)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        info!(user_id, workout_id, "Workout deleted");

        Ok(())
    }
}
