//! User repository for database operations
//!
//! The password hash only enters through [`NewUser::set_password`] and only
//! leaves through [`UserRecord::authenticate`]. Neither type serializes.

use crate::auth::PasswordService;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use std::fmt;

/// User record from database
#[derive(Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Check a plaintext password against the stored hash
    pub async fn authenticate(&self, password: &str) -> Result<bool> {
        PasswordService::verify_async(self.password_hash.clone(), password.to_string()).await
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A user that has not been stored yet
pub struct NewUser {
    pub username: String,
    password_hash: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: None,
        }
    }

    /// Hash the plaintext and keep only the hash
    pub async fn set_password(mut self, password: String) -> Result<Self> {
        self.password_hash = Some(PasswordService::hash_async(password).await?);
        Ok(self)
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a user; fails on a duplicate username
    pub async fn create<'e, E>(executor: E, user: &NewUser) -> Result<UserRecord>
    where
        E: PgExecutor<'e>,
    {
        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("User {} has no password set", user.username))?;

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(password_hash)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Find user by exact (case-sensitive) username
    pub async fn find_by_username<'e, E>(executor: E, username: &str) -> Result<Option<UserRecord>>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// Find user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<UserRecord>>
    where
        E: PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// Delete a user together with all of their workouts
    ///
    /// The foreign key cascades as well; deleting the workouts explicitly
    /// keeps the rule intact on schemas created without it.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM workouts WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every user (and, by cascade, every workout)
    pub async fn delete_all<'e, E>(executor: E) -> Result<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
