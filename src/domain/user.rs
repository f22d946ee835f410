use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub picture: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub is_active: ActiveStatus,
    pub is_verified: bool,
    pub auths: Vec<AuthProvider>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
}

impl ActiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveStatus::Active => "ACTIVE",
            ActiveStatus::Inactive => "INACTIVE",
            ActiveStatus::Blocked => "BLOCKED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ActiveStatus::Active),
            "INACTIVE" => Some(ActiveStatus::Inactive),
            "BLOCKED" => Some(ActiveStatus::Blocked),
            _ => None,
        }
    }
}

/// A login provider linked to the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthProvider {
    pub provider: String,
    pub provider_id: String,
}

impl AuthProvider {
    pub fn credentials(email: &str) -> Self {
        Self {
            provider: "credentials".to_string(),
            provider_id: email.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub phone: Option<String>,
    #[validate(url(message = "Picture must be a valid URL"))]
    pub picture: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<ActiveStatus>,
    pub is_verified: Option<bool>,
    pub auths: Option<Vec<AuthProvider>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "Picture must be a valid URL"))]
    pub picture: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<ActiveStatus>,
    pub is_verified: Option<bool>,
}
