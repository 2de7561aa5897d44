//! SQLite record store implementations.

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

mod actor_repo;
mod casting_repo;
mod helpers;
mod invoice_repo;
mod movie_repo;
mod schema;

#[cfg(test)]
mod repo_tests;

pub use actor_repo::SqliteActorRepo;
pub use casting_repo::SqliteCastingRepo;
pub use invoice_repo::SqliteInvoiceRepo;
pub use movie_repo::SqliteMovieRepo;
pub use schema::{ensure_schema, seed_sample_data};

/// Open (creating if missing) the SQLite database file at `db_path`.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Open a private in-memory database.
///
/// Pinned to a single connection that never expires: every new in-memory
/// connection would otherwise see its own empty database.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create all SQLite repositories from a connection pool.
pub struct SqliteRepositories {
    pub actor: Arc<SqliteActorRepo>,
    pub movie: Arc<SqliteMovieRepo>,
    pub casting: Arc<SqliteCastingRepo>,
    pub invoice: Arc<SqliteInvoiceRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            actor: Arc::new(SqliteActorRepo::new(pool.clone())),
            movie: Arc::new(SqliteMovieRepo::new(pool.clone())),
            casting: Arc::new(SqliteCastingRepo::new(pool.clone())),
            invoice: Arc::new(SqliteInvoiceRepo::new(pool)),
        }
    }
}
