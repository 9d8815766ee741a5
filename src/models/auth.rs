//! Authentication-related models

use serde::{Deserialize, Serialize};

use super::user::UserResponse;

/// Registration request. Fields are optional so an absent field reaches the
/// presence check instead of failing JSON extraction.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}
