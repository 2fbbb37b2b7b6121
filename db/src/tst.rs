//! Throwaway SQLite store for tests.
//!
//! A [`TestStore`] owns a uniquely named database file, a single pooled
//! connection to it and the schema created through [`crate::schema`].
//! Stores are reset between tests with [`TestStore::reset`] and torn down
//! with [`TestStore::release`], or [`TestStore::release_blocking`] when no
//! runtime is available (process exit).

use crate::{Result, schema};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

const FILE_PREFIX: &str = "taskboard-test-";
const FILE_SUFFIX: &str = ".db";
const SIDECAR_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

pub struct TestStore {
    pub path: PathBuf,
    pub db_url: String,
    conn: DatabaseConnection,
}

pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

impl TestStore {
    /// Creates a store in the system temp directory.
    pub async fn acquire() -> Result<Self> {
        Self::acquire_in(std::env::temp_dir()).await
    }

    pub async fn acquire_in<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(FILE_SUFFIX)
            .tempfile_in(dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| e.error)?;

        let db_url = sqlite_url(&path);

        // one connection, shared by the test body and whichever thread serves requests
        let conn = match schema::connect_sqlite(&db_url, 1).await {
            Ok(conn) => conn,
            Err(e) => {
                remove_store_files(&path);
                return Err(e);
            },
        };

        if let Err(e) = schema::create_all(&conn).await {
            tracing::error!(path = %path.display(), "failed to create test schema: {e}");
            let _ = conn.close().await;
            remove_store_files(&path);
            return Err(e);
        }

        tracing::info!(path = %path.display(), "acquired test store");

        Ok(Self { path, db_url, conn })
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Empties every registered table in one transaction. On failure the
    /// transaction is rolled back and the error is returned.
    pub async fn reset(&self) -> Result<u64> {
        let txn = self.conn.begin().await?;

        match schema::clear_all(&txn).await {
            Ok(removed) => {
                txn.commit().await?;
                tracing::debug!(removed, "reset test store");
                Ok(removed)
            },
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::warn!("rollback after failed reset also failed: {rollback}");
                }
                Err(e)
            },
        }
    }

    /// Drops the schema, closes the connection and removes the store file.
    ///
    /// File removal is best effort, see [`remove_store_files`]. The returned
    /// error, if any, is the schema drop failure.
    pub async fn release(self) -> Result<()> {
        let dropped = schema::drop_all(&self.conn).await;

        if let Err(e) = self.conn.close().await {
            tracing::warn!(path = %self.path.display(), "failed to close test store: {e}");
        }

        remove_store_files(&self.path);
        tracing::info!(path = %self.path.display(), "released test store");

        dropped
    }

    /// Release for contexts without a usable runtime, such as process exit.
    ///
    /// Runs on a fresh thread with its own runtime and a fresh connection, so
    /// the pooled connection (which may belong to a runtime that is gone) is
    /// never touched. Errors are logged, never returned.
    pub fn release_blocking(&self) {
        let path = self.path.clone();
        let db_url = self.db_url.clone();

        let worker = std::thread::spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    runtime.block_on(async {
                        match schema::connect_sqlite(&db_url, 1).await {
                            Ok(conn) => {
                                if let Err(e) = schema::drop_all(&conn).await {
                                    tracing::warn!("failed to drop test schema: {e}");
                                }
                                let _ = conn.close().await;
                            },
                            Err(e) => {
                                tracing::warn!("failed to reopen test store: {e}");
                            },
                        }
                    });
                },
                Err(e) => tracing::warn!("failed to start teardown runtime: {e}"),
            }

            remove_store_files(&path);
        });

        if worker.join().is_err() {
            tracing::warn!("test store teardown panicked");
        }
    }
}

/// Best-effort removal of a store file and its SQLite sidecars.
///
/// Missing files are ignored. Files that are still locked (permission denied
/// or busy) are left in place and logged at debug; any other failure is
/// logged as a warning. Nothing is returned as an error. Returns whether the
/// main file is gone afterwards.
pub fn remove_store_files(path: &Path) -> bool {
    let mut candidates = vec![path.to_path_buf()];
    for suffix in SIDECAR_SUFFIXES {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        candidates.push(PathBuf::from(name));
    }

    for candidate in &candidates {
        match std::fs::remove_file(candidate) {
            Ok(()) => tracing::debug!(path = %candidate.display(), "removed store file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {},
            Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::ResourceBusy) => {
                tracing::debug!(path = %candidate.display(), "store file still locked, leaving it: {e}");
            },
            Err(e) => {
                tracing::warn!(path = %candidate.display(), "failed to remove store file: {e}");
            },
        }
    }

    !path.exists()
}
