//! Authorization gate and authenticated-user extraction
//!
//! The gate runs in front of every routed endpoint. Endpoints on its
//! allow-list pass straight through; everything else needs a valid access
//! token from the cookie or an `Authorization: Bearer` header. The verified
//! identity is stored in request extensions for the handler.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, MatchedPath, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use tracing::debug;
use workout_tracker_shared::AuthError;

/// Route paths reachable without a token
pub const OPEN_ENDPOINTS: &[&str] = &[
    "/",
    "/health",
    "/health/ready",
    "/health/live",
    "/api/signup",
    "/api/login",
    "/api/logout",
];

/// Client-facing message for every gate rejection
pub const AUTHORIZATION_REQUIRED: &str = "Authorization required";

/// Allow-list of route paths that skip authentication
#[derive(Debug, Clone)]
pub struct AuthGate {
    open: HashSet<&'static str>,
}

impl AuthGate {
    pub fn new(open: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            open: open.into_iter().collect(),
        }
    }

    /// True if the matched route path needs no token
    pub fn is_open(&self, route: &str) -> bool {
        self.open.contains(route)
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(OPEN_ENDPOINTS.iter().copied())
    }
}

/// Authenticated user extracted from the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Pull the token from the cookie, falling back to the bearer header
pub fn extract_token<'a>(state: &AppState, headers: &'a HeaderMap) -> Result<&'a str, AuthError> {
    if let Some(token) = state.cookies().read(headers).filter(|t| !t.is_empty()) {
        return Ok(token);
    }

    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    value.strip_prefix("Bearer ").ok_or(AuthError::InvalidToken)
}

/// Verify the request's credentials
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let token = extract_token(state, headers)?;
    let user_id = state.jwt().verify(token)?;
    Ok(AuthUser { user_id })
}

/// Gate middleware; attach with `route_layer` so the matched path is known
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());

    if route.as_deref().is_some_and(|r| state.gate().is_open(r)) {
        return Ok(next.run(request).await);
    }

    match authenticate(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(reason) => {
            debug!(%reason, route = ?route, "Rejected unauthenticated request");
            Err(ApiError::Unauthorized(AUTHORIZATION_REQUIRED.to_string()))
        }
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already verified by the gate
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers).map_err(|reason| {
            debug!(%reason, "Rejected unauthenticated request");
            ApiError::Unauthorized(AUTHORIZATION_REQUIRED.to_string())
        })
    }
}
