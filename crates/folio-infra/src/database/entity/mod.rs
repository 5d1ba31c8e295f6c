//! SeaORM entities, one module per table.

pub mod access_token;
pub mod movie;
pub mod post;
pub mod user;
