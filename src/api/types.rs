use serde::Serialize;

/// Body of every failed request: `{"error": "<code>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const OK: Self = Self { ok: true };
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub status: &'static str,
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub role: crate::models::user::Role,
    pub approved: bool,
    pub created_at: String,
}

impl From<crate::models::user::User> for UserDto {
    fn from(user: crate::models::user::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            approved: user.approved,
            created_at: user.created_at,
        }
    }
}
