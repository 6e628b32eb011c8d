//! The database tools: connection check and ad-hoc statements.

use super::{
    domain::SqlOutcome,
    ports::{SqlExecutor, SqlExecutorError},
};
use crate::tool::domain::{
    CallContext, FieldSchema, InputSchema, ToolError, ToolOutput, ToolRegistrationError, ToolResult,
    ToolSpec,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Builds both database tools over a shared executor.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if any declaration is invalid.
pub fn sql_tools<E>(executor: &Arc<E>) -> Result<Vec<ToolSpec>, ToolRegistrationError>
where
    E: SqlExecutor + ?Sized + 'static,
{
    Ok(vec![
        sql_check_connection(Arc::clone(executor))?,
        sql_query(Arc::clone(executor))?,
    ])
}

/// `sql_check_connection`: reports whether the database is reachable.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn sql_check_connection<E>(executor: Arc<E>) -> Result<ToolSpec, ToolRegistrationError>
where
    E: SqlExecutor + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "sql_check_connection",
        "Check the database connection",
        InputSchema::new(),
        move |_input: serde_json::Value, _context: CallContext| {
            handle_check_connection(Arc::clone(&executor))
        },
    )
}

async fn handle_check_connection<E>(executor: Arc<E>) -> Result<ToolOutput, ToolError>
where
    E: SqlExecutor + ?Sized,
{
    Ok(match executor.check_connection().await {
        Ok(()) => "Database connection successful".into(),
        Err(SqlExecutorError::Connection(reason)) => {
            ToolResult::failure(format!("Database connection failed: {reason}")).into()
        }
        Err(err) => ToolResult::failure(format!("Database connection failed: {err}")).into(),
    })
}

#[derive(Debug, Deserialize)]
struct QueryInput {
    query: String,
}

/// `sql_query`: executes one statement and renders its result.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn sql_query<E>(executor: Arc<E>) -> Result<ToolSpec, ToolRegistrationError>
where
    E: SqlExecutor + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "sql_query",
        "Executes operations against the database",
        InputSchema::new().field(
            "query",
            FieldSchema::string().describe("The SQL statement to execute"),
        ),
        move |input: QueryInput, _context: CallContext| {
            handle_query(Arc::clone(&executor), input)
        },
    )
}

async fn handle_query<E>(executor: Arc<E>, input: QueryInput) -> Result<ToolOutput, ToolError>
where
    E: SqlExecutor + ?Sized,
{
    if input.query.trim().is_empty() {
        return Ok(ToolResult::failure("Query is required").into());
    }
    let rendered = match executor.execute(&input.query).await? {
        SqlOutcome::Rows(rows) => serde_json::to_string_pretty(&rows)?,
        SqlOutcome::Affected(count) => {
            serde_json::to_string_pretty(&json!({ "affectedRows": count }))?
        }
    };
    Ok(format!("Query executed successfully\n\n{rendered}").into())
}
