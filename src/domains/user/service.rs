use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

use super::{
  model::User,
  repository::{RepositoryError, UserRepository},
  validation::{validate_register, FieldErrors},
};
use crate::impl_service_error_conversions;

pub const EMAIL_TAKEN_MESSAGE: &str = "このEメールアドレスは既に登録されています";

#[derive(Debug)]
pub enum UserServiceError {
  ValidationError(FieldErrors),
  Conflict(String),
  InternalServerError(String),
}

impl Error for UserServiceError {}

impl std::fmt::Display for UserServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserServiceError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
      UserServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      UserServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(UserServiceError, InternalServerError, Conflict);

#[async_trait]
pub trait UserService: Send + Sync {
  /// Validates a raw registration payload and stores the user.
  async fn register(&self, raw: &Value) -> Result<User, UserServiceError>;
}

pub struct UserServiceImpl<U> {
  user_repository: U,
}

impl<U> UserServiceImpl<U>
where
  U: UserRepository,
{
  pub fn new(user_repository: U) -> Self {
    Self { user_repository }
  }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
  U: UserRepository,
{
  async fn register(&self, raw: &Value) -> Result<User, UserServiceError> {
    let input = validate_register(raw).map_err(|errors| {
      tracing::warn!("Registration rejected: {} invalid field(s)", errors.len());
      UserServiceError::ValidationError(errors)
    })?;

    let user = self.user_repository.create(&input).await.map_err(|err| match err {
      RepositoryError::Conflict(constraint) => {
        tracing::info!("Registration conflict on {}", constraint);
        UserServiceError::Conflict(EMAIL_TAKEN_MESSAGE.to_string())
      }
      other => other.into(),
    })?;

    tracing::info!("User {} registered", user.id);
    Ok(user)
  }
}
