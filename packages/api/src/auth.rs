//! Account types: `POST /api/register` and `POST /api/login`.

use serde::{Deserialize, Serialize};
use taskboard::validation::{is_strong_password, is_valid_email};
use taskboard::{RecordId, User, ValidationError};

/// Body of `POST /api/register`.
///
/// ```json
/// { "username": "ada", "email": "ada@example.com", "password": "Secur3!pw" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed every field check. The password is still
/// plain text; hashing happens in the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let (Some(username), Some(email), Some(password)) = (
            non_empty(self.username),
            non_empty(self.email),
            non_empty(self.password),
        ) else {
            return Err(ValidationError::MissingAccountFields);
        };
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_strong_password(&password) {
            return Err(ValidationError::WeakPassword);
        }
        Ok(Registration {
            username,
            email,
            password,
        })
    }
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let (Some(email), Some(password)) = (non_empty(self.email), non_empty(self.password))
        else {
            return Err(ValidationError::MissingCredentials);
        };
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Credentials { email, password })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// The public view of a [`User`]: no digest, no token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: RecordId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Response to a successful registration (`201 Created`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Response to a successful login.
///
/// ```json
/// {
///   "message": "Login successful",
///   "token": "9f2c...e1",
///   "user": { "id": 1, "username": "ada", "email": "ada@example.com" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}
