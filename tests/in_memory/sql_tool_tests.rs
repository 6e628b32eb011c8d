//! SQL tools served over a scripted executor.

use crate::in_memory::helpers::{TestError, call_tool, result_text, runtime, server_with_sql};
use mcp_planner::sql::adapters::memory::ScriptedSqlExecutor;
use mcp_planner::sql::domain::SqlOutcome;
use rstest::rstest;
use serde_json::{Value, json};
use std::io;
use tokio::runtime::Runtime;

/// Row-returning statements render their rows as pretty JSON.
#[rstest]
fn select_renders_rows(runtime: io::Result<Runtime>) -> Result<(), TestError> {
    let rt = runtime?;
    let executor = ScriptedSqlExecutor::new().with_outcome(
        "SELECT id, name FROM plans",
        SqlOutcome::Rows(vec![json!({"id": 1, "name": "Release"})]),
    );
    let srv = server_with_sql(executor.clone())?;

    let result = rt.block_on(call_tool(
        &srv,
        "sql_query",
        json!({"query": "SELECT id, name FROM plans;"}),
    ))?;

    let text = result_text(&result)?;
    let (header, body) = text
        .split_once("\n\n")
        .ok_or("rows must follow a blank line")?;
    assert_eq!(header, "Query executed successfully");
    let rows: Value = serde_json::from_str(body)?;
    assert_eq!(rows, json!([{"id": 1, "name": "Release"}]));
    assert_eq!(executor.executed(), vec!["SELECT id, name FROM plans"]);
    Ok(())
}

/// Statements without rows report the affected count.
#[rstest]
fn update_reports_affected_rows(runtime: io::Result<Runtime>) -> Result<(), TestError> {
    let rt = runtime?;
    let executor = ScriptedSqlExecutor::new().with_outcome(
        "UPDATE plans SET status = 'ARCHIVED'",
        SqlOutcome::Affected(3),
    );
    let srv = server_with_sql(executor)?;

    let result = rt.block_on(call_tool(
        &srv,
        "sql_query",
        json!({"query": "UPDATE plans SET status = 'ARCHIVED'"}),
    ))?;

    let text = result_text(&result)?;
    assert!(text.starts_with("Query executed successfully"));
    assert!(text.contains("\"affectedRows\": 3"));
    Ok(())
}

/// Database errors surface as execution faults with their classification.
#[rstest]
fn rejected_statement_is_an_execution_fault(
    runtime: io::Result<Runtime>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server_with_sql(ScriptedSqlExecutor::new())?;

    let result = rt.block_on(call_tool(&srv, "sql_query", json!({"query": "SELEC 1"})))?;

    assert_eq!(result.get("isError"), Some(&json!(true)));
    assert_eq!(
        result.pointer("/metadata/errorType"),
        Some(&json!("SqlExecutorError"))
    );
    assert!(result_text(&result)?.starts_with("Error in tool sql_query: statement failed"));
    Ok(())
}

/// A blank query is refused before reaching the database.
#[rstest]
fn blank_query_is_refused(runtime: io::Result<Runtime>) -> Result<(), TestError> {
    let rt = runtime?;
    let executor = ScriptedSqlExecutor::new();
    let srv = server_with_sql(executor.clone())?;

    let result = rt.block_on(call_tool(&srv, "sql_query", json!({"query": "   "})))?;

    assert_eq!(result.get("isError"), Some(&json!(true)));
    assert_eq!(result_text(&result)?, "Query is required");
    assert!(executor.executed().is_empty());
    Ok(())
}

/// Connection checks report both outcomes as text.
#[rstest]
#[case(ScriptedSqlExecutor::new(), false, "Database connection successful")]
#[case(
    ScriptedSqlExecutor::new().offline("connection refused"),
    true,
    "Database connection failed: connection refused"
)]
fn connection_check_reports_outcome(
    runtime: io::Result<Runtime>,
    #[case] executor: ScriptedSqlExecutor,
    #[case] is_error: bool,
    #[case] expected: &str,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server_with_sql(executor)?;

    let result = rt.block_on(call_tool(&srv, "sql_check_connection", json!({})))?;

    assert_eq!(result.get("isError"), Some(&json!(is_error)));
    assert_eq!(result_text(&result)?, expected);
    Ok(())
}
