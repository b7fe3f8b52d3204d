//! Authentication routes
//!
//! Signup and login answer with the serialized user and set the access
//! token cookie. Logout clears it.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{Session, UserService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;
use workout_tracker_shared::{LoginRequest, MessageResponse, SignupRequest, UserResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/me", get(me))
}

fn session_cookie(state: &AppState, token: &str) -> Result<HeaderValue, ApiError> {
    state
        .cookies()
        .issue(token)
        .map_err(|e| ApiError::Internal(e.into()))
}

fn session_response(state: &AppState, status: StatusCode, session: Session) -> ApiResult<Response> {
    let cookie = session_cookie(state, &session.token)?;
    Ok((status, [(SET_COOKIE, cookie)], Json(session.user)).into_response())
}

/// POST /api/signup
async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = body?;
    let session = UserService::signup(state.db(), state.jwt(), req).await?;
    session_response(&state, StatusCode::CREATED, session)
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = body?;
    let session = UserService::login(state.db(), state.jwt(), req).await?;
    session_response(&state, StatusCode::OK, session)
}

/// DELETE /api/logout
///
/// Succeeds whether or not the caller was signed in. Tokens are stateless,
/// so an already-copied token stays valid until it expires.
async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cleared = state
        .cookies()
        .clear()
        .map_err(|e| ApiError::Internal(e.into()))?;

    info!("User logged out");

    let body = MessageResponse {
        message: "Successfully logged out".to_string(),
    };
    Ok((StatusCode::OK, [(SET_COOKIE, cleared)], Json(body)).into_response())
}

/// GET /api/me
async fn me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = UserService::current_user(state.db(), auth_user.user_id).await?;
    Ok(Json(user))
}
