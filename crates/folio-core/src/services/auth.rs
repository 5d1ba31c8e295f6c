//! Credential checks and bearer token issuance.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{AccessToken, Credentials, NewUser, Registration, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    AccessTokenRepository, AuthError, PasswordService, RecordLookup, TokenSigner, UserRepository,
};
use crate::validation::{ValidationErrors, schemas};

/// Name recorded on tokens issued by login and registration.
pub const ACCESS_TOKEN_NAME: &str = "access_token";

/// A freshly issued bearer token and the user it belongs to.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user: User,
    pub access_token: String,
}

/// Registration, login and bearer token resolution.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AccessTokenRepository>,
    lookup: Arc<dyn RecordLookup>,
    passwords: Arc<dyn PasswordService>,
    signer: Arc<dyn TokenSigner>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AccessTokenRepository>,
        lookup: Arc<dyn RecordLookup>,
        passwords: Arc<dyn PasswordService>,
        signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            users,
            tokens,
            lookup,
            passwords,
            signer,
        }
    }

    /// Validate a registration body, create the user and issue a token.
    pub async fn register(&self, body: &Value) -> Result<IssuedToken, DomainError> {
        let registration: Registration = schemas::registration()
            .validate(body, self.lookup.as_ref())
            .await?
            .into_payload()?;

        let password_hash = self
            .passwords
            .hash(&registration.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .create(NewUser::new(
                registration.name,
                registration.email,
                password_hash,
            ))
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration of the same email.
                RepoError::Constraint(_) => DomainError::Validation(ValidationErrors::single(
                    "email",
                    "The email has already been taken.",
                )),
                other => other.into(),
            })?;
        tracing::info!(user_id = user.id, "User registered");

        self.issue_token(user).await
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, body: &Value) -> Result<IssuedToken, DomainError> {
        let credentials: Credentials = schemas::login()
            .validate(body, self.lookup.as_ref())
            .await?
            .into_payload()?;

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            tracing::debug!("Login rejected: unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(&credentials.password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        self.issue_token(user).await
    }

    /// Persist a token record for `user` and sign it.
    pub async fn issue_token(&self, user: User) -> Result<IssuedToken, DomainError> {
        let record = self
            .tokens
            .save(AccessToken::new(user.id, ACCESS_TOKEN_NAME))
            .await?;

        let access_token = self
            .signer
            .sign(&record)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(IssuedToken { user, access_token })
    }

    /// Resolve a bearer string to the user it was issued to.
    pub async fn authenticate(&self, bearer: &str) -> Result<User, AuthError> {
        let claims = self.signer.verify(bearer)?;

        let record = self
            .tokens
            .find_by_id(claims.token_id)
            .await?
            .ok_or(AuthError::RevokedToken)?;

        if record.user_id != claims.user_id {
            return Err(AuthError::InvalidToken(
                "Token subject does not match its record".to_string(),
            ));
        }

        self.users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AuthError::RevokedToken)
    }
}
