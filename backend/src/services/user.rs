//! User service for signup, login and the current-user view
//!
//! Password hashing and verification run on the blocking thread pool.
//! Token signing uses the pre-computed keys held in `AppState`.

use crate::auth::{JwtService, PasswordService};
use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRecord, UserRepository, WorkoutRepository};
use sqlx::PgPool;
use tracing::info;
use workout_tracker_shared::validation::validate_username;
use workout_tracker_shared::{LoginRequest, SignupRequest, UserResponse, WorkoutSummary};

pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const CREDENTIALS_REQUIRED: &str = "Username and password are required";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const USERNAME_TAKEN: &str = "Username already exists";

/// A user together with a freshly issued access token
pub struct Session {
    pub user: UserResponse,
    pub token: String,
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Check a signup payload before any I/O
    ///
    /// Returns the username and password on success.
    pub fn check_signup(req: SignupRequest) -> Result<(String, String), ApiError> {
        let password = req
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::validation(PASSWORD_REQUIRED))?;

        let username = req.username.unwrap_or_default();
        validate_username(&username).map_err(ApiError::validation)?;

        Ok((username, password))
    }

    /// Check a login payload before any I/O
    pub fn check_login(req: LoginRequest) -> Result<(String, String), ApiError> {
        match (req.username, req.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(ApiError::BadRequest(CREDENTIALS_REQUIRED.to_string())),
        }
    }

    /// Register a new user and sign them in
    ///
    /// The insert and token issue share one transaction, so a failure at
    /// any step leaves no user behind.
    pub async fn signup(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: SignupRequest,
    ) -> Result<Session, ApiError> {
        let (username, password) = Self::check_signup(req)?;

        let new_user = NewUser::new(username)
            .set_password(password)
            .await
            .map_err(ApiError::Internal)?;

        let mut tx = pool.begin().await?;

        let user = match UserRepository::create(&mut *tx, &new_user).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
            }
            Err(e) => return Err(ApiError::Internal(e)),
        };

        let token = jwt_service.issue(user.id).map_err(ApiError::Internal)?;

        tx.commit().await?;

        info!(user_id = user.id, username = %user.username, "User signed up");

        Ok(Session {
            user: Self::serialize(user, Vec::new()),
            token,
        })
    }

    /// Login with username and password
    ///
    /// Unknown usernames and wrong passwords get the same answer.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: LoginRequest,
    ) -> Result<Session, ApiError> {
        let (username, password) = Self::check_login(req)?;

        let user = UserRepository::find_by_username(pool, &username)
            .await
            .map_err(ApiError::Internal)?;

        // Unknown usernames still pay for one argon2 verification
        let valid = match &user {
            Some(user) => user.authenticate(&password).await,
            None => PasswordService::verify_missing_async(password).await,
        }
        .map_err(ApiError::Internal)?;

        let user = match user {
            Some(user) if valid => user,
            _ => return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())),
        };

        let token = jwt_service.issue(user.id).map_err(ApiError::Internal)?;
        let user = Self::current_user(pool, user.id).await?;

        info!(user_id = user.id, "User logged in");

        Ok(Session { user, token })
    }

    /// The user behind a verified token, with their workouts
    pub async fn current_user(pool: &PgPool, user_id: i64) -> Result<UserResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let workouts = WorkoutRepository::list_all_for_user(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(WorkoutSummary::from)
            .collect();

        Ok(Self::serialize(user, workouts))
    }

    fn serialize(user: UserRecord, workouts: Vec<WorkoutSummary>) -> UserResponse {
        UserResponse {
            id: user.id,
            username: user.username,
            workouts,
        }
    }
}
