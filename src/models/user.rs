use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => anyhow::bail!("Unknown role: {other}"),
        }
    }
}

/// Live authorization state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatus {
    pub role: Role,
    pub approved: bool,
}

impl UserStatus {
    /// Admins are always let through; everyone else waits for approval.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.approved || self.role == Role::Admin
    }
}

/// Stored credentials for password verification. Never serialized.
#[derive(Clone)]
pub struct UserCredentials {
    pub password_hash: String,
    pub status: UserStatus,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("password_hash", &"<redacted>")
            .field("status", &self.status)
            .finish()
    }
}

/// User data returned from the store (without the password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("Admin".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_is_active() {
        let admin_unapproved = UserStatus {
            role: Role::Admin,
            approved: false,
        };
        let pending = UserStatus {
            role: Role::User,
            approved: false,
        };
        let approved = UserStatus {
            role: Role::User,
            approved: true,
        };

        assert!(admin_unapproved.is_active());
        assert!(!pending.is_active());
        assert!(approved.is_active());
    }

    #[test]
    fn test_credentials_debug_hides_hash() {
        let creds = UserCredentials {
            password_hash: "$argon2id$secret".to_string(),
            status: UserStatus {
                role: Role::User,
                approved: true,
            },
        };
        assert!(!format!("{creds:?}").contains("argon2id"));
    }
}
