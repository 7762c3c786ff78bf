use axum::{
  extract::{rejection::JsonRejection, Json, State},
  http::StatusCode,
  response::Json as JsonResponse,
  routing::{post, Router},
};
use serde_json::Value;

use super::model::UserResponse;
use crate::{state::AppState, utils::error::AppError};

pub fn user_routes<S: AppState>() -> Router<S> {
  Router::new().route("/users", post(create_user_handler::<S>))
}

/// Takes the body as raw JSON so that missing, mistyped and unknown fields all reach the validator.
pub async fn create_user_handler<S: AppState>(
  State(state): State<S>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, JsonResponse<UserResponse>), AppError> {
  let Json(payload) = payload?;
  let user = state.register_user(payload).await?;
  Ok((StatusCode::CREATED, JsonResponse(user.into())))
}

#[cfg(test)]
mod tests {
  use crate::test_support::{app_with_memory, post_json};
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt;
  use serde_json::{json, Value};

  #[tokio::test]
  async fn create_user_endpoint_returns_user() {
    let app = app_with_memory();
    let payload = json!({
      "email": "api-create@example.com",
      "displayName": "API Create",
      "password": "Passw0rd!",
    });
    let (status, body) = post_json(app, "/api/v1/users", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let user: Value = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(user["email"], "api-create@example.com");
    assert_eq!(user["displayName"], "API Create");
    assert_eq!(user["status"], "pending");
    assert!(user["id"].is_number());
    assert!(user["createdAt"].is_string());
    assert!(user.get("password").is_none());
  }

  #[tokio::test]
  async fn create_user_endpoint_ignores_status() {
    let app = app_with_memory();
    let payload = json!({
      "email": "x@y.com",
      "displayName": "ab",
      "password": "Abcdef1!",
      "status": "admin",
    });
    let (status, body) = post_json(app, "/api/v1/users", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let user: Value = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(user["status"], "pending");
  }

  #[tokio::test]
  async fn create_user_endpoint_invalid_input() {
    let app = app_with_memory();
    let payload = json!({
      "email": "invalid-email",
      "displayName": "Test User",
      "password": "password123",
    });
    let (status, body) = post_json(app, "/api/v1/users", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(body["errors"]["email"], json!(["Eメールアドレスを入力してください"]));
    assert_eq!(
      body["errors"]["password"],
      json!([
        "パスワードには最低一つの大文字が含まれていなければなりません",
        "パスワードには最低一つの特殊文字が含まれていなければなりません"
      ])
    );
    assert!(body["errors"].get("displayName").is_none());
  }

  #[tokio::test]
  async fn create_user_endpoint_without_json_content_type() {
    let app = app_with_memory();
    let request = Request::builder()
      .method("POST")
      .uri("/api/v1/users")
      .body(Body::from(r#"{"email":"x@y.com"}"#))
      .expect("build request");

    let response = app.oneshot(request).await.expect("handle request");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .expect("read response body");
    let body: Value = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(body["status_code"], 415);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn create_user_endpoint_duplicate_email() {
    let app = app_with_memory();
    let payload = json!({
      "email": "dup@example.com",
      "displayName": "First",
      "password": "Abcdef1!",
    });
    let (status, _) = post_json(app.clone(), "/api/v1/users", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(app, "/api/v1/users", &payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(body["error"], "このEメールアドレスは既に登録されています");
  }
}
