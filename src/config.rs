use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub bind_addr: String,
  pub max_connections: u32,
}

impl AppConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
    let database_url = lookup("DATABASE_URL").context("DATABASE_URL environment variable must be set")?;
    let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
      Some(value) => value
        .parse()
        .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {:?}", value))?,
      None => DEFAULT_MAX_CONNECTIONS,
    };

    Ok(Self {
      database_url,
      bind_addr,
      max_connections,
    })
  }
}
