use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::AppResult;

pub mod kv_store;
pub mod migrations;

pub mod repositories;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Hands out short-lived connections to one SQLite file. Every store call
/// opens its own connection, so per-connection setup stays light and the
/// schema is migrated once when the pool is created.
#[derive(Clone, Debug)]
pub struct DbPool {
    path: PathBuf,
}

impl DbPool {
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        info!(target: "app::db", db_path = %path.display(), "initializing database pool");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = Self { path };
        let conn = pool.get_connection()?;
        // WAL is persistent in the file header; set it once here.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run(&conn)?;

        Ok(pool)
    }

    pub fn get_connection(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.path)?;
        configure_connection(&conn)?;
        debug!(target: "app::db", db_path = %self.path.display(), "database connection ready");
        Ok(conn)
    }

    pub fn with_connection<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.get_connection()?;
        callback(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Each write replaces a whole habit list, so under WAL an fsync per
/// checkpoint (`NORMAL`) is enough; a crash can lose the last write but never
/// tear a list.
fn configure_connection(conn: &Connection) -> AppResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}
