//! Auth gate: the [`AuthService`] implementation composing the credential
//! store, the password hasher and the token codec.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::db::InsertUserError;
use crate::models::user::Role;
use crate::services::auth_service::{
    AuthError, AuthService, AuthSession, AuthUser, HeaderProblem, ValidationReason,
};
use crate::services::credential_store::CredentialStore;
use crate::services::password::Argon2Hasher;
use crate::services::token::TokenCodec;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

const BEARER_PREFIX: &str = "Bearer ";
const PLACEHOLDER_PASSWORD: &str = "telecombase-placeholder-password";

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Usernames are compared case-sensitively after trimming surrounding whitespace.
#[must_use]
pub fn normalize_username(username: &str) -> &str {
    username.trim()
}

/// Length rules for new accounts; `username` must already be normalized.
pub fn validate_registration(username: &str, password: &str) -> Result<(), ValidationReason> {
    if username.is_empty() {
        return Err(ValidationReason::UsernameRequired);
    }
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len()) {
        return Err(ValidationReason::UsernameLengthInvalid);
    }
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return Err(ValidationReason::PasswordLengthInvalid);
    }
    Ok(())
}

/// Extracts the token from `Bearer <token>`.
pub fn parse_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingOrMalformedAuthorization(HeaderProblem::Missing))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingOrMalformedAuthorization(HeaderProblem::Malformed))?;

    Ok(token)
}

pub struct AuthGate {
    store: Arc<dyn CredentialStore>,
    hasher: Argon2Hasher,
    tokens: TokenCodec,
    clock: Clock,
    /// Digest checked against when the username is unknown.
    placeholder_digest: OnceCell<String>,
}

impl AuthGate {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Argon2Hasher, tokens: TokenCodec) -> Self {
        Self {
            store,
            hasher,
            tokens,
            clock: Arc::new(Utc::now),
            placeholder_digest: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Unknown usernames cost one Argon2 verify, same as a wrong password.
    async fn verify_placeholder(&self, password: &str) {
        let digest = self
            .placeholder_digest
            .get_or_try_init(|| self.hasher.hash(PLACEHOLDER_PASSWORD))
            .await;

        match digest {
            Ok(digest) => {
                let _ = self.hasher.verify(password, digest).await;
            }
            Err(e) => debug!(error = %e, "Placeholder digest unavailable"),
        }
    }

    fn issue_session(&self, username: &str, role: Role) -> Result<AuthSession, AuthError> {
        let token = self
            .tokens
            .issue(username, role, self.now())
            .map_err(|e| AuthError::SigningFailure(e.to_string()))?;

        Ok(AuthSession {
            token,
            username: username.to_string(),
            role,
        })
    }
}

fn record_auth_event(event: &'static str) {
    metrics::counter!("auth_events_total", "event" => event).increment(1);
}

#[async_trait]
impl AuthService for AuthGate {
    async fn register(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let username = normalize_username(username);
        validate_registration(username, password).map_err(AuthError::Validation)?;

        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        let status = match self
            .store
            .insert_with_auto_role(username, &password_hash)
            .await
        {
            Ok(status) => status,
            Err(InsertUserError::UniqueViolation) => {
                record_auth_event("register_conflict");
                return Err(AuthError::UsernameTaken);
            }
            Err(InsertUserError::Other(e)) => return Err(e.into()),
        };

        if !status.is_active() {
            info!(username, "Registered account awaiting approval");
            record_auth_event("register_pending");
            return Err(AuthError::PendingApproval);
        }

        info!(username, role = %status.role, "Registered account");
        record_auth_event("register");
        self.issue_session(username, status.role)
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(credentials) = self.store.find_by_username(username).await? else {
            self.verify_placeholder(password).await;
            debug!(username, "Login for unknown user");
            record_auth_event("login_failed");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify(password, &credentials.password_hash)
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        if !valid {
            debug!(username, "Login with wrong password");
            record_auth_event("login_failed");
            return Err(AuthError::InvalidCredentials);
        }

        if !credentials.status.is_active() {
            record_auth_event("login_pending");
            return Err(AuthError::PendingApproval);
        }

        info!(username, "User logged in");
        record_auth_event("login");
        self.issue_session(username, credentials.status.role)
    }

    async fn authorize(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError> {
        let token = parse_bearer(authorization)?;

        let claims = self
            .tokens
            .verify(token, self.now())
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        // The token only vouches for identity; role and approval come from storage.
        let status = self
            .store
            .find_role_and_approval(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !status.is_active() {
            return Err(AuthError::PendingApproval);
        }

        Ok(AuthUser {
            username: claims.sub,
            role: status.role,
        })
    }
}
