//! Workout repository for database operations
//!
//! Every read joins the owner so responses can embed `{id, username}`
//! without a second round trip. Writes use a CTE for the same reason.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgExecutor;
use workout_tracker_shared::{UserSummary, WorkoutDraft, WorkoutResponse, WorkoutSummary};

/// Workout record joined with its owner's username
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: i64,
    pub title: String,
    pub duration: Option<i32>,
    pub date: Option<NaiveDate>,
    pub user_id: i64,
    pub username: String,
}

impl WorkoutRecord {
    /// The editable fields, for merging a partial update
    pub fn draft(&self) -> WorkoutDraft {
        WorkoutDraft {
            title: self.title.clone(),
            duration: self.duration,
            date: self.date,
        }
    }
}

impl From<WorkoutRecord> for WorkoutResponse {
    fn from(record: WorkoutRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            duration: record.duration,
            date: record.date,
            user: UserSummary {
                id: record.user_id,
                username: record.username,
            },
        }
    }
}

impl From<WorkoutRecord> for WorkoutSummary {
    fn from(record: WorkoutRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            duration: record.duration,
            date: record.date,
        }
    }
}

/// Workout repository for database operations
pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Insert a workout owned by `user_id`
    pub async fn create<'e, E>(executor: E, user_id: i64, draft: &WorkoutDraft) -> Result<WorkoutRecord>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            WITH w AS (
                INSERT INTO workouts (title, duration, date, user_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, duration, date, user_id
            )
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM w
            JOIN users u ON u.id = w.user_id
            "#,
        )
        .bind(&draft.title)
        .bind(draft.duration)
        .bind(draft.date)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Find a workout by ID regardless of owner
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<WorkoutRecord>>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM workouts w
            JOIN users u ON u.id = w.user_id
            WHERE w.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// Same as [`Self::find_by_id`] but locks the row until the transaction ends
    pub async fn find_by_id_for_update<'e, E>(executor: E, id: i64) -> Result<Option<WorkoutRecord>>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM workouts w
            JOIN users u ON u.id = w.user_id
            WHERE w.id = $1
            FOR UPDATE OF w
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// One page of a user's workouts, oldest first
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutRecord>>
    where
        E: PgExecutor<'e>,
    {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM workouts w
            JOIN users u ON u.id = w.user_id
            WHERE w.user_id = $1
            ORDER BY w.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    /// Every workout a user owns, oldest first
    pub async fn list_all_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<WorkoutRecord>>
    where
        E: PgExecutor<'e>,
    {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM workouts w
            JOIN users u ON u.id = w.user_id
            WHERE w.user_id = $1
            ORDER BY w.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn count_for_user<'e, E>(executor: E, user_id: i64) -> Result<i64>
    where
        E: PgExecutor<'e>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Overwrite the editable fields; `user_id` is never touched
    pub async fn update<'e, E>(executor: E, id: i64, draft: &WorkoutDraft) -> Result<WorkoutRecord>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            WITH w AS (
                UPDATE workouts
                SET title = $2, duration = $3, date = $4
                WHERE id = $1
                RETURNING id, title, duration, date, user_id
            )
            SELECT w.id, w.title, w.duration, w.date, w.user_id, u.username
            FROM w
            JOIN users u ON u.id = w.user_id
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(draft.duration)
        .bind(draft.date)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every workout (seeding only)
    pub async fn delete_all<'e, E>(executor: E) -> Result<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM workouts").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
