//! Workout Tracker Backend Library
//!
//! Exposes the backend modules for the server binary, the seed binary and
//! the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
