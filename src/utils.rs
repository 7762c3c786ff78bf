use tracing_subscriber::EnvFilter;

pub mod error;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  tracing_subscriber::fmt().with_env_filter(filter).init();
}
