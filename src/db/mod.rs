//! Database layer for the task bot.

pub mod tasks;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Database handle wrapping a SQLite connection.
///
/// Opened once at startup, cloned into whoever needs it, and closed with
/// [`Database::close`] on shutdown.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL lets readers proceed while the bot writes
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing and throwaway console sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations.
    fn run_migrations(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let report = embedded::migrations::runner().run(conn)?;
            debug!(
                applied = report.applied_migrations().len(),
                "Database migrations complete"
            );
            Ok(())
        })
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&conn)
    }

    /// Execute a function with mutable access to the connection.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&mut conn)
    }

    /// Close the connection.
    ///
    /// When other clones of the handle are still alive the connection stays
    /// open and is closed when the last clone drops.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex
                    .into_inner()
                    .map_err(|_| anyhow!("database connection lock poisoned"))?;
                conn.close().map_err(|(_, e)| anyhow::Error::from(e))?;
                debug!("Database connection closed");
                Ok(())
            }
            Err(_) => {
                debug!("Database handle still shared; deferring close to last owner");
                Ok(())
            }
        }
    }
}
