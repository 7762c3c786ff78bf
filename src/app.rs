use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{domains::user::rest::user_routes, state::AppState};

pub fn create_app<S: AppState>(state: S) -> Router {
  Router::new()
    .route("/", get(health_handler))
    .nest("/api/v1", user_routes::<S>())
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

pub async fn health_handler() -> &'static str {
  "ok"
}
