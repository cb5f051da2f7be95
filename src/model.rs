use serde::{Deserialize, Serialize};

// Data model representing an application user
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub role: String,
    pub phone_number: Option<String>,
}

// Data model representing a Todo item
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i64,
}

/// Capability tier resolved from the stored role string when the caller is
/// authenticated. The `users.role` column stays free text; the comparison
/// is case-insensitive so "admin" and "Admin" grant the same tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_db(raw: &str) -> Role {
        if raw.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

/// Identity attached to the request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}
