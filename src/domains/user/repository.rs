use async_trait::async_trait;
use sqlx::PgPool;

use super::{
  model::{RegisterInput, User},
  schema::USER_ENTITY,
};

#[derive(Debug)]
pub enum RepositoryError {
  DatabaseError(sqlx::Error),
  Conflict(String),
}

impl std::error::Error for RepositoryError {}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RepositoryError::DatabaseError(err) => write!(f, "Database error: {}", err),
      RepositoryError::Conflict(msg) => write!(f, "Conflict: {}", msg),
    }
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(err: sqlx::Error) -> Self {
    match &err {
      sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
        RepositoryError::Conflict(db_err.constraint().unwrap_or("unique constraint").to_string())
      }
      _ => RepositoryError::DatabaseError(err),
    }
  }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Stores a validated registration. `id`, `status` and `created_at` come from the column defaults.
  async fn create(&self, input: &RegisterInput) -> Result<User, RepositoryError>;
}

pub struct SqlxUserRepository {
  pub pool: PgPool,
}

impl SqlxUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
  async fn create(&self, input: &RegisterInput) -> Result<User, RepositoryError> {
    let sql = USER_ENTITY.insert_sql();

    let user = sqlx::query_as::<_, User>(&sql)
      .bind(input.email())
      .bind(input.display_name())
      .bind(input.password())
      .fetch_one(&self.pool)
      .await?;

    Ok(user)
  }
}
