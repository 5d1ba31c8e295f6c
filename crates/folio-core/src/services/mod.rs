//! Application services that orchestrate ports.

mod auth;

pub use auth::{AuthService, IssuedToken};
