//! Port contract for ad-hoc statement execution.

use super::domain::SqlOutcome;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for statement execution.
pub type SqlExecutorResult<T> = Result<T, SqlExecutorError>;

/// Executes ad-hoc statements against a relational database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Verifies that a connection can be opened and used.
    async fn check_connection(&self) -> SqlExecutorResult<()>;

    /// Executes one statement.
    async fn execute(&self, statement: &str) -> SqlExecutorResult<SqlOutcome>;
}

/// Errors returned by statement executors.
#[derive(Debug, Clone, Error)]
pub enum SqlExecutorError {
    /// No usable connection could be obtained.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The database rejected the statement.
    #[error("statement failed: {0}")]
    Statement(Arc<dyn std::error::Error + Send + Sync>),

    /// The result could not be decoded.
    #[error("invalid result payload: {0}")]
    InvalidPayload(String),
}

impl SqlExecutorError {
    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a statement failure.
    pub fn statement(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Statement(Arc::new(err))
    }
}
