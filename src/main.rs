use tokio::signal;

use dotenvy::dotenv;

use user_accounts_api::app::create_app;
use user_accounts_api::config::AppConfig;
use user_accounts_api::db::create_pool;
use user_accounts_api::state::SharedAppState;
use user_accounts_api::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  init_tracing();

  let config = AppConfig::from_env()?;
  let pool = create_pool(&config).await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database migrations applied successfully");

  let app_state = SharedAppState::new(pool);
  let app = create_app(app_state);

  let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

  tracing::info!("Server running on http://{}", config.bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {}", err);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(err) => {
        tracing::error!("Failed to install signal handler: {}", err);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
