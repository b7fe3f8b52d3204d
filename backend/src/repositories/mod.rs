//! Database repositories
//!
//! Query functions are generic over `PgExecutor`, so the same call works
//! against the pool or inside a caller's transaction.

pub mod user;
pub mod workout;

pub use user::{NewUser, UserRecord, UserRepository};
pub use workout::{WorkoutRecord, WorkoutRepository};
