pub mod auth_service;
pub use auth_service::{
    AuthError, AuthService, AuthSession, AuthUser, HeaderProblem, ValidationReason,
};

pub mod auth_service_impl;
pub use auth_service_impl::AuthGate;

pub mod credential_store;
pub use credential_store::CredentialStore;

pub mod password;
pub use password::{Argon2Hasher, HashError};

pub mod token;
pub use token::{Claims, TokenCodec, TokenError};

pub mod user_service;
pub use user_service::{UserAdminError, UserAdminService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
