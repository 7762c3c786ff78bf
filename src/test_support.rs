use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use chrono::Utc;
use serde::Serialize;
use tower::ServiceExt;

use crate::{
  app::create_app,
  domains::user::{
    model::{RegisterInput, User},
    repository::{RepositoryError, UserRepository},
    schema::DEFAULT_STATUS,
  },
  state::SharedAppState,
};

/// Keeps users in memory and enforces the unique email column the way the table does.
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, input: &RegisterInput) -> Result<User, RepositoryError> {
    let mut users = self.users.lock().expect("user store lock");
    if users.iter().any(|user| user.email == input.email()) {
      return Err(RepositoryError::Conflict("users_email_key".to_string()));
    }

    let user = User {
      id: users.len() as i32 + 1,
      email: input.email().to_string(),
      display_name: input.display_name().to_string(),
      password: input.password().to_string(),
      status: DEFAULT_STATUS.to_string(),
      created_at: Utc::now(),
    };
    users.push(user.clone());
    Ok(user)
  }
}

pub fn app_with_memory() -> Router {
  let state = SharedAppState::with_repository(InMemoryUserRepository::default());
  create_app(state)
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(body).expect("serialize request body")))
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}
