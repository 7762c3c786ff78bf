use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
  pub id: i32,
  pub email: String,
  pub display_name: String,
  pub password: String,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

/// Validated registration payload. Only produced by
/// [`validate_register`](super::validation::validate_register).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
  pub(super) email: String,
  pub(super) display_name: String,
  pub(super) password: String,
}

impl RegisterInput {
  pub fn email(&self) -> &str {
    &self.email
  }

  pub fn display_name(&self) -> &str {
    &self.display_name
  }

  pub fn password(&self) -> &str {
    &self.password
  }
}

/// Validated login payload. Only produced by
/// [`validate_login`](super::validation::validate_login).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginInput {
  pub(super) email: String,
  pub(super) password: String,
}

impl LoginInput {
  pub fn email(&self) -> &str {
    &self.email
  }

  pub fn password(&self) -> &str {
    &self.password
  }
}

/// What the API hands back after registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
  pub id: i32,
  pub email: String,
  pub display_name: String,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      email: user.email,
      display_name: user.display_name,
      status: user.status,
      created_at: user.created_at,
    }
  }
}
