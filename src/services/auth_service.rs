//! Domain service for authentication and authorization.
//!
//! Handles registration, login and bearer-token authorization. Every error a
//! caller can see is one of [`AuthError`]'s variants.

use serde::Serialize;
use thiserror::Error;

use crate::models::user::Role;

/// Why a registration request was rejected before touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    UsernameRequired,
    UsernameLengthInvalid,
    PasswordLengthInvalid,
}

impl ValidationReason {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UsernameRequired => "username_required",
            Self::UsernameLengthInvalid => "username_length_invalid",
            Self::PasswordLengthInvalid => "password_length_invalid",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// What was wrong with the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProblem {
    /// Absent or empty.
    Missing,
    /// Not `Bearer <token>`, or the token is blank.
    Malformed,
}

impl HeaderProblem {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing => "missing_authorization",
            Self::Malformed => "invalid_authorization",
        }
    }
}

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReason),

    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or malformed authorization header: {}", .0.code())]
    MissingOrMalformedAuthorization(HeaderProblem),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account pending approval")]
    PendingApproval,

    #[error("Forbidden")]
    Forbidden,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Token signing failed: {0}")]
    SigningFailure(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// Successful register/login outcome.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
    pub role: Role,
}

/// Identity of an authorized request, carrying the *live* role from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin-only guard.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account. The first account becomes an approved admin; later
    /// accounts are created but get [`AuthError::PendingApproval`] instead of a token.
    async fn register(&self, username: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown users and wrong
    /// passwords alike.
    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Validates an `Authorization` header value and re-reads the account's
    /// live role and approval.
    async fn authorize(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError>;
}
