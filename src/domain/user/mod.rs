//! User aggregate — model, DTOs and repository interface

pub mod repository;

pub use repository::UserRepositoryInterface;

use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
    Viewer,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Viewer
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Viewer => "viewer",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Whether this role may create assessments.
    pub fn can_assess(&self) -> bool {
        matches!(self, Self::Admin | Self::User)
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Payload for creating a user. The password arrives in plain text and is
/// hashed by the repository.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: Option<UserRole>,
}

/// Partial update of user profile fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// List query parameters for users.
#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
}
