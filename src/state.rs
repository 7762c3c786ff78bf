use std::sync::Arc;

use serde_json::Value;
use sqlx::PgPool;

use crate::domains::user::{
  model::User,
  repository::{SqlxUserRepository, UserRepository},
  service::{UserService, UserServiceError, UserServiceImpl},
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn register_user(&self, raw: Value) -> impl std::future::Future<Output = Result<User, UserServiceError>> + Send;
}

pub struct SharedAppState<R = SqlxUserRepository> {
  pub user_service: Arc<UserServiceImpl<R>>,
}

impl<R> Clone for SharedAppState<R> {
  fn clone(&self) -> Self {
    Self {
      user_service: Arc::clone(&self.user_service),
    }
  }
}

impl SharedAppState {
  pub fn new(pool: PgPool) -> Self {
    Self::with_repository(SqlxUserRepository::new(pool))
  }
}

impl<R: UserRepository> SharedAppState<R> {
  pub fn with_repository(user_repository: R) -> Self {
    Self {
      user_service: Arc::new(UserServiceImpl::new(user_repository)),
    }
  }
}

impl<R: UserRepository + 'static> AppState for SharedAppState<R> {
  async fn register_user(&self, raw: Value) -> Result<User, UserServiceError> {
    self.user_service.register(&raw).await
  }
}
