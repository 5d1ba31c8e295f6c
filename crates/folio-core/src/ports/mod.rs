//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod lookup;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenSigner};
pub use lookup::{LookupColumn, LookupValue, RecordLookup};
pub use repository::{AccessTokenRepository, MovieRepository, PostRepository, UserRepository};
