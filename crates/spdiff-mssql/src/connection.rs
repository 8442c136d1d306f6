//! MS SQL Server connection wrapper over tiberius

use std::sync::atomic::{AtomicBool, Ordering};
use tiberius::{Client, Row};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::Compat;
use spdiff_core::SpdiffError;

/// Connection-layer errors.
///
/// These never reach the shell directly; the resolver and catalog collapse
/// them into the sentinel / empty-value contract and log the detail.
#[derive(Debug, thiserror::Error)]
pub enum MssqlConnectionError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connect timed out after {0} seconds")]
    Timeout(u64),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Tiberius error: {0}")]
    Tiberius(#[from] tiberius::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MssqlConnectionError> for SpdiffError {
    fn from(err: MssqlConnectionError) -> Self {
        match err {
            MssqlConnectionError::QueryFailed(msg) => SpdiffError::Query(msg),
            MssqlConnectionError::Timeout(secs) => {
                SpdiffError::Timeout(format!("connect timed out after {secs}s"))
            }
            other => SpdiffError::Connection(other.to_string()),
        }
    }
}

/// An open connection to one SQL Server database (or instance scope).
///
/// Bound to the database it was resolved for; it is never re-pointed at a
/// different database. One handle per side per user action, dropped when the
/// action completes.
pub struct MssqlConnection {
    client: Mutex<Client<Compat<TcpStream>>>,
    closed: AtomicBool,
    database: Option<String>,
}

impl MssqlConnection {
    pub(crate) fn new(client: Client<Compat<TcpStream>>, database: Option<String>) -> Self {
        Self {
            client: Mutex::new(client),
            closed: AtomicBool::new(false),
            database,
        }
    }

    /// The database this handle was resolved for, if any.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        tracing::debug!(database = self.database.as_deref(), "connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_not_closed(&self) -> Result<(), MssqlConnectionError> {
        if self.is_closed() {
            return Err(MssqlConnectionError::ConnectionClosed);
        }
        Ok(())
    }

    /// Run a read-only query and collect the first result set.
    ///
    /// Parameters are always bound (`@P1`, `@P2`, ...), never interpolated
    /// into the query text.
    pub(crate) async fn query_rows(
        &self,
        sql: &str,
        params: &[&dyn tiberius::ToSql],
    ) -> Result<Vec<Row>, MssqlConnectionError> {
        self.ensure_not_closed()?;
        let start = std::time::Instant::now();

        let mut client = self.client.lock().await;
        let stream = client
            .query(sql, params)
            .await
            .map_err(|e| MssqlConnectionError::QueryFailed(e.to_string()))?;

        let rows = stream
            .into_first_result()
            .await
            .map_err(|e| MssqlConnectionError::QueryFailed(e.to_string()))?;

        tracing::debug!(
            row_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "query completed"
        );

        Ok(rows)
    }
}

impl std::fmt::Debug for MssqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlConnection")
            .field("database", &self.database)
            .field("closed", &self.is_closed())
            .finish()
    }
}
