//! # Folio API Server
//!
//! Actix-web application: token auth, posts and movies.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod resources;
pub mod state;
pub mod telemetry;
