//! SQL tools over [`PostgresSqlExecutor`].
//!
//! [`PostgresSqlExecutor`]: mcp_planner::sql::adapters::postgres::PostgresSqlExecutor

use crate::postgres::helpers::{
    BoxError, PreparedDatabase, call_tool, prepared_database, result_text,
};
use rstest::rstest;
use serde_json::{Value, json};

/// Selects return rows as JSON objects and updates report counts.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statements_render_rows_and_counts(
    prepared_database: Result<Option<PreparedDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(database) = prepared_database? else {
        return Ok(());
    };
    let server = database.server()?;
    call_tool(
        &server,
        "create_plan",
        json!({
            "name": "Audit",
            "description": "Audit access",
            "confident": 40,
            "uncertainties": []
        }),
    )
    .await?;

    let connected = call_tool(&server, "sql_check_connection", json!({})).await?;
    assert_eq!(result_text(&connected)?, "Database connection successful");

    let selected = call_tool(
        &server,
        "sql_query",
        json!({"query": "SELECT plan_id, name, status FROM plans ORDER BY plan_id;"}),
    )
    .await?;
    let (_, body) = result_text(&selected)?
        .split_once("\n\n")
        .ok_or("rows must follow a blank line")?;
    let rows: Value = serde_json::from_str(body)?;
    assert_eq!(
        rows,
        json!([{"plan_id": 1, "name": "Audit", "status": "ACTIVE"}])
    );

    let archived = call_tool(
        &server,
        "sql_query",
        json!({"query": "UPDATE plans SET status = 'ARCHIVED'"}),
    )
    .await?;
    assert!(result_text(&archived)?.contains("\"affectedRows\": 1"));

    let listed = call_tool(&server, "get_all_plans", json!({})).await?;
    assert_eq!(result_text(&listed)?, "No active plans");
    Ok(())
}

/// Trailing comments and data-modifying `WITH` statements both execute.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commented_and_modifying_statements_execute(
    prepared_database: Result<Option<PreparedDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(database) = prepared_database? else {
        return Ok(());
    };
    let server = database.server()?;

    let commented = call_tool(
        &server,
        "sql_query",
        json!({"query": "SELECT 1 AS one -- sanity check"}),
    )
    .await?;
    assert_eq!(commented.get("isError"), Some(&json!(false)));
    assert!(result_text(&commented)?.contains("\"one\": 1"));

    let inserted = call_tool(
        &server,
        "sql_query",
        json!({"query": concat!(
            "WITH fresh AS (INSERT INTO plans (name, description, confident) ",
            "VALUES ('Bulk', 'Bulk import', 10) RETURNING plan_id) ",
            "SELECT plan_id FROM fresh"
        )}),
    )
    .await?;
    assert_eq!(inserted.get("isError"), Some(&json!(false)));
    assert!(result_text(&inserted)?.contains("affectedRows"));
    Ok(())
}

/// Statements the database rejects are execution faults.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_statement_is_a_fault(
    prepared_database: Result<Option<PreparedDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(database) = prepared_database? else {
        return Ok(());
    };
    let server = database.server()?;

    let result = call_tool(
        &server,
        "sql_query",
        json!({"query": "SELECT * FROM no_such_table"}),
    )
    .await?;

    assert_eq!(result.get("isError"), Some(&json!(true)));
    assert_eq!(
        result.pointer("/metadata/errorType"),
        Some(&json!("SqlExecutorError"))
    );
    Ok(())
}
