//! Scripted statement executor for tests and offline runs.

use crate::sql::{
    domain::{SqlOutcome, normalize_statement},
    ports::{SqlExecutor, SqlExecutorError, SqlExecutorResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Executor that answers from a table of canned outcomes.
///
/// Statements are matched after normalization. Unknown statements fail as
/// the database would reject them.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSqlExecutor {
    state: Arc<RwLock<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    outcomes: HashMap<String, SqlOutcome>,
    offline_reason: Option<String>,
    executed: Vec<String>,
}

impl ScriptedSqlExecutor {
    /// Creates an executor with no scripted statements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome of a statement.
    #[must_use]
    pub fn with_outcome(self, statement: &str, outcome: SqlOutcome) -> Self {
        if let Ok(mut state) = self.state.write() {
            state
                .outcomes
                .insert(normalize_statement(statement).to_owned(), outcome);
        }
        self
    }

    /// Makes every call fail as if the database were unreachable.
    #[must_use]
    pub fn offline(self, reason: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.offline_reason = Some(reason.into());
        }
        self
    }

    /// Returns the statements executed so far.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.executed.clone())
            .unwrap_or_default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> SqlExecutorError {
    SqlExecutorError::connection(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SqlExecutor for ScriptedSqlExecutor {
    async fn check_connection(&self) -> SqlExecutorResult<()> {
        let state = self.state.read().map_err(lock_error)?;
        match &state.offline_reason {
            Some(reason) => Err(SqlExecutorError::connection(std::io::Error::other(
                reason.clone(),
            ))),
            None => Ok(()),
        }
    }

    async fn execute(&self, statement: &str) -> SqlExecutorResult<SqlOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(reason) = &state.offline_reason {
            return Err(SqlExecutorError::connection(std::io::Error::other(
                reason.clone(),
            )));
        }
        let normalized = normalize_statement(statement).to_owned();
        state.executed.push(normalized.clone());
        state.outcomes.get(&normalized).cloned().ok_or_else(|| {
            SqlExecutorError::statement(std::io::Error::other(format!(
                "syntax error or unknown statement: {normalized}"
            )))
        })
    }
}
