//! API request and response types

use crate::errors::ValidationFailure;
use crate::validation::collect_messages;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// ============================================================================
// Pagination
// ============================================================================

/// Raw pagination query parameters (`?page=2&per_page=5`)
///
/// Values that are not integers are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub per_page: Option<i64>,
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

impl PageQuery {
    /// Resolve defaults and clamp to sane bounds.
    ///
    /// Pages below 1 become 1, a non-positive page size falls back to the
    /// default, and oversized pages are capped at `max_per_page`.
    pub fn normalize(&self, default_per_page: i64, max_per_page: i64) -> Pagination {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = match self.per_page {
            Some(n) if n >= 1 => n.min(max_per_page),
            _ => default_per_page,
        };
        Pagination { page, per_page }
    }
}

/// Resolved pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    /// Number of rows to skip
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Page count for `total` rows; zero when there are no rows
    #[inline]
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(pagination: Pagination, total: i64, items: Vec<T>) -> Self {
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            total_pages: pagination.total_pages(total),
            items,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Plain message body (logout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Users
// ============================================================================

/// Signup request
///
/// Fields are optional so that missing values surface as validation
/// errors instead of body rejections. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Serialized user with their workouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub workouts: Vec<WorkoutSummary>,
}

/// Owner reference embedded in a workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

// ============================================================================
// Workouts
// ============================================================================

/// Workout as nested under its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub title: String,
    pub duration: Option<i32>,
    pub date: Option<NaiveDate>,
}

/// Workout with its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub id: i64,
    pub title: String,
    pub duration: Option<i32>,
    pub date: Option<NaiveDate>,
    pub user: UserSummary,
}

/// Create workout request
///
/// Any owner field sent by the client is ignored; the owner is always the
/// authenticated user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkoutRequest {
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub date: Option<NaiveDate>,
}

/// Partial workout update
///
/// Outer `None` means "not supplied"; `Some(None)` means an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkoutRequest {
    #[serde(default, deserialize_with = "explicit_null")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub duration: Option<Option<i32>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub date: Option<Option<NaiveDate>>,
}

fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The writable fields of a workout, validated as a whole
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct WorkoutDraft {
    #[validate(length(min = 1, message = "Workout title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "Duration must be a positive number"))]
    pub duration: Option<i32>,
    pub date: Option<NaiveDate>,
}

impl WorkoutDraft {
    /// Overlay the supplied fields of a partial update
    pub fn apply(&mut self, patch: UpdateWorkoutRequest) {
        if let Some(title) = patch.title {
            self.title = title.unwrap_or_default();
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    /// Run the field rules and return the messages on failure
    pub fn check(&self) -> Result<(), ValidationFailure> {
        self.validate()
            .map_err(|errors| ValidationFailure(collect_messages(&errors)))
    }
}

impl From<CreateWorkoutRequest> for WorkoutDraft {
    fn from(req: CreateWorkoutRequest) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            duration: req.duration,
            date: req.date,
        }
    }
}
