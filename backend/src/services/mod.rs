//! Business logic services
//!
//! Services validate input, coordinate repositories inside transactions and
//! map failures onto `ApiError`.

pub mod user;
pub mod workout;

pub use user::{Session, UserService};
pub use workout::{ensure_owner, WorkoutService};
