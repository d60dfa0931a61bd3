// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes; the
//! conditional operations in the query modules rely on this ordering.

use porter_core::PorterError;
use tracing::debug;

const WAL_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;";

const ROLLBACK_PRAGMAS: &str = "PRAGMA journal_mode = DELETE;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;";

/// Handle to the single SQLite connection used for all reads and writes.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    wal_mode: bool,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply pragmas,
    /// and run any pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, PorterError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(map_tr_err)?;
        }

        // Refinery wants a plain `&mut rusqlite::Connection`, so migrations
        // run on a short-lived blocking handle that is dropped before the
        // async writer connection opens.
        let migration_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), PorterError> {
            let mut conn = rusqlite::Connection::open(&migration_path).map_err(map_tr_err)?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| PorterError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        let pragmas = if wal_mode { WAL_PRAGMAS } else { ROLLBACK_PRAGMAS };
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn, wal_mode })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL (when enabled) and flush pending writes.
    pub async fn close(&self) -> Result<(), PorterError> {
        if self.wal_mode {
            self.conn
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

/// Map any storage-layer error into [`PorterError::Storage`].
pub(crate) fn map_tr_err<E>(e: E) -> PorterError
where
    E: std::error::Error + Send + Sync + 'static,
{
    PorterError::Storage {
        source: Box::new(e),
    }
}
