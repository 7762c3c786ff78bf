use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::{json, Value};

use crate::domains::user::{service::UserServiceError, validation::FieldErrors};

const VALIDATION_FAILED_MESSAGE: &str = "入力内容に誤りがあります";

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
  /// Per-field messages, rendered under `errors`.
  pub details: Option<Value>,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
      details: None,
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::new(StatusCode::CONFLICT, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }

  pub fn validation(errors: &FieldErrors) -> Self {
    Self {
      details: Some(json!(errors)),
      ..Self::bad_request(VALIDATION_FAILED_MESSAGE)
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let mut body = json!({
      "error": self.message,
      "status_code": self.status_code.as_u16(),
    });
    if let Some(details) = self.details {
      body["errors"] = details;
    }

    (self.status_code, Json(body)).into_response()
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    AppError::new(rejection.status(), rejection.body_text())
  }
}

impl From<UserServiceError> for AppError {
  fn from(error: UserServiceError) -> Self {
    match error {
      UserServiceError::ValidationError(errors) => AppError::validation(&errors),
      UserServiceError::Conflict(msg) => AppError::conflict(msg),
      UserServiceError::InternalServerError(msg) => {
        tracing::error!("{}", msg);
        AppError::internal_server_error("Internal server error occurred")
      }
    }
  }
}
