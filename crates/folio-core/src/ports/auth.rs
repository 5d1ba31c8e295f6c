//! Authentication ports.

use uuid::Uuid;

use crate::domain::AccessToken;
use crate::error::RepoError;

/// Claims carried by a signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub token_id: Uuid,
    pub user_id: i64,
}

/// Turns token records into bearer strings and back.
///
/// A verified string is not yet a valid credential: the record named by
/// `token_id` must still exist.
pub trait TokenSigner: Send + Sync {
    /// Produce the bearer string handed to the client.
    fn sign(&self, token: &AccessToken) -> Result<String, AuthError>;

    /// Check the signature and decode the claims.
    fn verify(&self, bearer: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token signing error: {0}")]
    Signing(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}
