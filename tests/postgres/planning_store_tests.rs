//! Planning tools over [`PostgresPlanningRepository`].
//!
//! [`PostgresPlanningRepository`]: mcp_planner::planning::adapters::postgres::PostgresPlanningRepository

use crate::postgres::helpers::{
    BoxError, PreparedDatabase, call_tool, prepared_database, result_text,
};
use rstest::rstest;
use serde_json::{Value, json};

/// Plans, uncertainties, and todos persist across calls.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planning_records_round_trip_through_postgres(
    prepared_database: Result<Option<PreparedDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(database) = prepared_database? else {
        return Ok(());
    };
    let server = database.server()?;

    let created = call_tool(
        &server,
        "create_plan",
        json!({
            "name": "Migrate",
            "description": "Move plans to PostgreSQL",
            "confident": 55,
            "uncertainties": [
                {
                    "description": "Lock duration?",
                    "uncertaintyConfidence": 20,
                    "actionsToResolve": "Measure"
                },
                {
                    "description": "Rollback path?",
                    "uncertaintyConfidence": 35,
                    "actionsToResolve": "Rehearse"
                }
            ]
        }),
    )
    .await?;
    assert_eq!(result_text(&created)?, "Plan created successfully: 1");

    let assessed = call_tool(
        &server,
        "update_uncertainty_confidence",
        json!({"uncertaintyId": 2, "confidence": 80, "actionsResult": "Rehearsed twice"}),
    )
    .await?;
    assert!(result_text(&assessed)?.starts_with("Uncertainty updated successfully: 2"));

    let added = call_tool(
        &server,
        "add_todo_to_plan",
        json!({
            "planId": 1,
            "description": "Run migration",
            "priority": "MEDIUM",
            "status": "IN_PROGRESS"
        }),
    )
    .await?;
    assert_eq!(result_text(&added)?, "Todo added successfully: 1");

    let reported = call_tool(
        &server,
        "report_todo",
        json!({"todoId": 1, "report": "Done in 4s", "status": "DONE"}),
    )
    .await?;
    assert_eq!(result_text(&reported)?, "Todo reported successfully: 1");

    let detailed = call_tool(&server, "get_detailed_plan", json!({"planId": 1})).await?;
    let detail: Value = serde_json::from_str(result_text(&detailed)?)?;
    assert_eq!(detail.pointer("/plan/confident"), Some(&json!(55)));
    assert_eq!(
        detail
            .get("uncertainties")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(detail.pointer("/uncertainties/1/confidence"), Some(&json!(80)));
    assert_eq!(detail.pointer("/todos/0/priority"), Some(&json!("MEDIUM")));
    assert_eq!(detail.pointer("/todos/0/status"), Some(&json!("DONE")));
    Ok(())
}

/// Adding a todo to a missing plan is reported as text, not a fault.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn todo_for_missing_plan_is_not_found(
    prepared_database: Result<Option<PreparedDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(database) = prepared_database? else {
        return Ok(());
    };
    let server = database.server()?;

    let result = call_tool(
        &server,
        "add_todo_to_plan",
        json!({"planId": 99, "description": "Orphan", "priority": "LOW", "status": "TODO"}),
    )
    .await?;

    assert_eq!(result.get("isError"), Some(&json!(false)));
    assert_eq!(result_text(&result)?, "Plan not found");
    Ok(())
}
