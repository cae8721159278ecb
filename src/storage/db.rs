use std::time::Duration;

use log::{debug, info};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};

use crate::constants::{SQLITE_MEMORY_URL, SQL_LOG_LEVEL};
use crate::repositories::RepositoryError;

/// Owned handle to a database connection.
///
/// Repositories borrow the session for the duration of each call; closing it
/// requires exclusive access, so no repository can be mid-call when that
/// happens.
pub struct Session {
    conn: Option<DatabaseConnection>,
}

impl Session {
    /// Connect to the database behind `url`.
    ///
    /// In-memory SQLite databases live and die with their connection, so the
    /// pool is pinned to a single connection that is never reaped.
    pub async fn connect(url: &str) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .sqlx_logging(true)
            .sqlx_logging_level(SQL_LOG_LEVEL)
            .connect_timeout(Duration::from_secs(10));

        if is_sqlite_memory(url) {
            options
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(Duration::from_secs(u32::MAX as u64))
                .max_lifetime(Duration::from_secs(u32::MAX as u64));
        }

        let conn = Database::connect(options).await?;

        if conn.get_database_backend() == DbBackend::Sqlite {
            // Cascading deletes rely on this pragma, which SQLite keeps per connection.
            conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        }

        info!("Opened database session ({:?})", conn.get_database_backend());
        Ok(Self { conn: Some(conn) })
    }

    /// Open a fresh, private in-memory SQLite database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        Self::connect(SQLITE_MEMORY_URL).await
    }

    /// Wrap an already established connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn: Some(conn) }
    }

    /// A session with no connection behind it.
    pub fn detached() -> Self {
        Self { conn: None }
    }

    /// The live connection, or [`RepositoryError::MissingSession`] once closed.
    pub fn connection(&self) -> Result<&DatabaseConnection, RepositoryError> {
        self.conn.as_ref().ok_or(RepositoryError::MissingSession)
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn backend(&self) -> Option<DbBackend> {
        self.conn.as_ref().map(ConnectionTrait::get_database_backend)
    }

    /// Close the underlying connection. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<(), DbErr> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            debug!("Closed database session");
        }
        Ok(())
    }
}

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_in_memory_sqlite_urls() {
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(is_sqlite_memory("sqlite:file:taskdb?mode=memory&cache=shared"));
        assert!(!is_sqlite_memory("sqlite://./taskdb.sqlite?mode=rwc"));
        assert!(!is_sqlite_memory("postgres://user:pw@localhost:5432/taskdb"));
    }

    #[test]
    fn detached_session_reports_missing_connection() {
        let session = Session::detached();
        assert!(!session.is_open());
        assert!(session.backend().is_none());
        assert!(matches!(session.connection(), Err(RepositoryError::MissingSession)));
    }
}
