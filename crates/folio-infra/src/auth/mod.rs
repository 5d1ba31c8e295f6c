//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenSigner};
pub use password::Argon2PasswordService;
