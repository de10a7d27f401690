use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::Storage;

mod book_repo;
mod goal_repo;
mod mapping;
mod migrate;
mod newsletter_repo;
mod profile_repo;
mod reading_log_repo;

/// Local `SQLite` backend implementing every repository contract.
///
/// Mirrors the hosted schema closely enough for offline development and
/// tests: reading logs cascade with their book, goals are unique per user and
/// newsletter emails are unique.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Applied to every pooled connection. `foreign_keys` is what makes deleting
/// a book drop its reading logs; the busy timeout covers the shared-cache
/// memory databases the tests open from several connections.
const CONNECTION_PRAGMAS: [&str; 3] = [
    "PRAGMA foreign_keys = ON;",
    "PRAGMA journal_mode = WAL;",
    "PRAGMA busy_timeout = 5000;",
];

const MAX_CONNECTIONS: u32 = 5;

impl SqliteRepository {
    /// Open a pool on `database_url` (`sqlite:shelf.db`,
    /// `sqlite:file:name?mode=memory&cache=shared`, ...). Tables are not
    /// created here; call [`SqliteRepository::migrate`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when the database cannot be opened or a
    /// connection pragma is rejected.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    for pragma in CONNECTION_PRAGMAS {
                        sqlx::query(pragma).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        log::debug!("connected to sqlite at {database_url}");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the books, logs, goals, profiles and subscribers tables up to
    /// the latest schema version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration statement fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Local backend for offline use: connect, migrate and hand every
    /// repository the same pool.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when connecting or migrating fails.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        Ok(Self::from_repository(repo))
    }
}
