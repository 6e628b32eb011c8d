//! `PostgreSQL` statement executor.

use crate::database::PgPool;
use crate::sql::{
    domain::{SqlOutcome, StatementKind, normalize_statement},
    ports::{SqlExecutor, SqlExecutorError, SqlExecutorResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Jsonb;
use serde_json::Value;

#[derive(Debug, QueryableByName)]
struct JsonRows {
    #[diesel(sql_type = Jsonb)]
    payload: Value,
}

/// Executes statements over a pooled `PostgreSQL` connection.
///
/// Row-returning statements are wrapped so the server aggregates each row
/// into a JSON object, which keeps arbitrary column types decodable.
#[derive(Debug, Clone)]
pub struct PostgresSqlExecutor {
    pool: PgPool,
}

impl PostgresSqlExecutor {
    /// Creates an executor from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> SqlExecutorResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SqlExecutorResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SqlExecutorError::connection)?;
            operation(&mut connection)
        })
        .await
        .map_err(SqlExecutorError::connection)?
    }
}

#[async_trait]
impl SqlExecutor for PostgresSqlExecutor {
    async fn check_connection(&self) -> SqlExecutorResult<()> {
        self.run_blocking(|connection| {
            diesel::sql_query("SELECT 1")
                .execute(connection)
                .map_err(SqlExecutorError::connection)?;
            Ok(())
        })
        .await
    }

    async fn execute(&self, statement: &str) -> SqlExecutorResult<SqlOutcome> {
        let normalized = normalize_statement(statement).to_owned();
        self.run_blocking(move |connection| match StatementKind::classify(&normalized) {
            StatementKind::Rows => {
                let rows = diesel::sql_query(wrap_as_json(&normalized))
                    .get_result::<JsonRows>(connection)
                    .map_err(SqlExecutorError::statement)?;
                match rows.payload {
                    Value::Array(items) => Ok(SqlOutcome::Rows(items)),
                    other => Err(SqlExecutorError::InvalidPayload(format!(
                        "expected a JSON array, received {other}"
                    ))),
                }
            }
            StatementKind::Command => diesel::sql_query(normalized.as_str())
                .execute(connection)
                .map(SqlOutcome::Affected)
                .map_err(SqlExecutorError::statement),
        })
        .await
    }
}

/// Closes the subquery on its own line so a trailing `--` comment in
/// `statement` cannot swallow it.
fn wrap_as_json(statement: &str) -> String {
    format!(
        "SELECT COALESCE(jsonb_agg(to_jsonb(q)), '[]'::jsonb) AS payload FROM ({statement}\n) AS q"
    )
}
