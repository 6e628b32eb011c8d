//! Planning tools driven end to end through `tools/call`.

use crate::in_memory::helpers::{TestError, TestServer, call_tool, result_text, runtime, server};
use rstest::rstest;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

async fn create_release_plan(srv: &TestServer) -> Result<Value, TestError> {
    call_tool(
        srv,
        "create_plan",
        json!({
            "name": "Release",
            "description": "Cut the 1.0 release",
            "confident": 60,
            "uncertainties": [{
                "description": "Does the migration run on the replica?",
                "uncertaintyConfidence": 30,
                "actionsToResolve": "Dry-run the migration"
            }]
        }),
    )
    .await
}

/// A plan moves from creation through research, revision, and todos.
#[rstest]
fn full_planning_workflow(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    rt.block_on(async {
        let created = create_release_plan(&srv).await?;
        assert_eq!(created.get("isError"), Some(&json!(false)));
        assert_eq!(result_text(&created)?, "Plan created successfully: 1");

        let listed = call_tool(&srv, "get_all_plans", json!({})).await?;
        let plans: Value = serde_json::from_str(result_text(&listed)?)?;
        assert_eq!(plans.pointer("/0/planId"), Some(&json!(1)));
        assert_eq!(plans.pointer("/0/status"), Some(&json!("ACTIVE")));

        let research = call_tool(
            &srv,
            "do_research_on_uncertainty",
            json!({"uncertaintyId": 1, "researchTool": ["grep_search", "list_dir"]}),
        )
        .await?;
        let instructions = result_text(&research)?;
        assert!(instructions.contains("Does the migration run on the replica?"));
        assert!(instructions.contains("grep_search, list_dir"));

        let assessed = call_tool(
            &srv,
            "update_uncertainty_confidence",
            json!({"uncertaintyId": 1, "confidence": 90, "actionsResult": "Dry run passed"}),
        )
        .await?;
        assert!(result_text(&assessed)?.starts_with("Uncertainty updated successfully: 1"));

        let improved = call_tool(
            &srv,
            "improve_plan",
            json!({"planId": 1, "description": "Cut 1.0 after the replica dry run"}),
        )
        .await?;
        assert_eq!(
            result_text(&improved)?,
            "Plan updated successfully: 1, the next step is to add todo to the plan"
        );

        let added = call_tool(
            &srv,
            "add_todo_to_plan",
            json!({
                "planId": 1,
                "description": "Tag the release",
                "priority": "HIGH",
                "status": "TODO"
            }),
        )
        .await?;
        assert_eq!(result_text(&added)?, "Todo added successfully: 1");

        let doing = call_tool(&srv, "do_todo", json!({"todoId": 1})).await?;
        assert_eq!(
            result_text(&doing)?,
            "Please do the todo: Tag the release sequentially"
        );

        let reported = call_tool(
            &srv,
            "report_todo",
            json!({"todoId": 1, "report": "Tagged v1.0.0"}),
        )
        .await?;
        assert_eq!(result_text(&reported)?, "Todo reported successfully: 1");

        let detailed = call_tool(&srv, "get_detailed_plan", json!({"planId": 1})).await?;
        let detail: Value = serde_json::from_str(result_text(&detailed)?)?;
        assert_eq!(
            detail.pointer("/plan/description"),
            Some(&json!("Cut 1.0 after the replica dry run"))
        );
        assert_eq!(detail.pointer("/uncertainties/0/confidence"), Some(&json!(90)));
        assert_eq!(
            detail.pointer("/uncertainties/0/actionsResult"),
            Some(&json!("Dry run passed"))
        );
        assert_eq!(detail.pointer("/todos/0/status"), Some(&json!("DONE")));
        assert_eq!(detail.pointer("/todos/0/report"), Some(&json!("Tagged v1.0.0")));
        Ok::<(), TestError>(())
    })
}

/// Missing records are reported as plain text, never as errors.
#[rstest]
#[case("get_detailed_plan", json!({"planId": 42}), "Plan not found")]
#[case("improve_plan", json!({"planId": 42, "description": "x"}), "Plan not found")]
#[case(
    "add_todo_to_plan",
    json!({"planId": 42, "description": "x", "priority": "LOW", "status": "TODO"}),
    "Plan not found"
)]
#[case(
    "update_uncertainty_confidence",
    json!({"uncertaintyId": 42, "confidence": 10, "actionsResult": "x"}),
    "Uncertainty not found"
)]
#[case(
    "do_research_on_uncertainty",
    json!({"uncertaintyId": 42, "researchTool": ["file_search"]}),
    "Uncertainty not found"
)]
#[case("do_todo", json!({"todoId": 42}), "Todo not found")]
#[case("report_todo", json!({"todoId": 42, "report": "x"}), "Todo not found")]
fn missing_records_are_reported_as_text(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
    #[case] tool: &str,
    #[case] arguments: Value,
    #[case] expected: &str,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let result = rt.block_on(call_tool(&srv, tool, arguments))?;

    assert_eq!(result.get("isError"), Some(&json!(false)));
    assert_eq!(result_text(&result)?, expected);
    Ok(())
}

/// An empty store lists no active plans.
#[rstest]
fn empty_store_has_no_active_plans(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let result = rt.block_on(call_tool(&srv, "get_all_plans", json!({})))?;

    assert_eq!(result_text(&result)?, "No active plans");
    Ok(())
}

/// Invalid enum values, out-of-range confidence, and ids that overflow `i64`
/// never reach the store.
#[rstest]
#[case(
    "add_todo_to_plan",
    json!({"planId": 1, "description": "x", "priority": "URGENT", "status": "TODO"}),
    "priority"
)]
#[case(
    "do_research_on_uncertainty",
    json!({"uncertaintyId": 1, "researchTool": ["telepathy"]}),
    "researchTool.0"
)]
#[case(
    "update_uncertainty_confidence",
    json!({"uncertaintyId": 1, "confidence": -1, "actionsResult": "x"}),
    "confidence"
)]
#[case(
    "get_detailed_plan",
    json!({"planId": 9_223_372_036_854_775_808_u64}),
    "planId"
)]
#[case("get_detailed_plan", json!({"planId": 1e20}), "planId")]
#[case("do_todo", json!({"todoId": -1e20}), "todoId")]
fn invalid_arguments_are_validation_errors(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
    #[case] tool: &str,
    #[case] arguments: Value,
    #[case] field: &str,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let result = rt.block_on(call_tool(&srv, tool, arguments))?;

    assert_eq!(result.get("isError"), Some(&json!(true)));
    assert_eq!(
        result.pointer("/metadata/errorType"),
        Some(&json!("ValidationError"))
    );
    assert!(result_text(&result)?.starts_with(field));
    Ok(())
}
