//! Authentication module
//!
//! Argon2 password hashing, JWT access tokens delivered by cookie, and the
//! per-request authorization gate.

mod cookie;
mod jwt;
mod middleware;
mod password;

pub use cookie::CookieSettings;
pub use jwt::{Claims, JwtService};
pub use middleware::{
    auth_gate, authenticate, extract_token, AuthGate, AuthUser, AUTHORIZATION_REQUIRED,
    OPEN_ENDPOINTS,
};
pub use password::PasswordService;
