//! JSON-RPC routing tests for [`McpServer`].

use crate::in_memory::helpers::{TestError, TestServer, runtime, server};
use mcp_planner::server::protocol::DEFAULT_PROTOCOL_VERSION;
use rstest::rstest;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn request(method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 7, "method": method, "params": params})
}

/// `initialize` echoes the client's protocol version and names the server.
#[rstest]
fn initialize_echoes_client_protocol_version(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_message(request(
            "initialize",
            json!({"protocolVersion": "2025-03-26", "capabilities": {}}),
        )))
        .ok_or("initialize must be answered")?;

    let result = response.result.ok_or("initialize must succeed")?;
    assert_eq!(response.id, json!(7));
    assert_eq!(result.pointer("/protocolVersion"), Some(&json!("2025-03-26")));
    assert_eq!(result.pointer("/serverInfo/name"), Some(&json!("mcp-planner")));
    assert!(result.pointer("/capabilities/tools").is_some_and(Value::is_object));
    Ok(())
}

/// `initialize` without a version falls back to the default.
#[rstest]
fn initialize_defaults_protocol_version(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_message(request("initialize", json!({}))))
        .ok_or("initialize must be answered")?;

    let result = response.result.ok_or("initialize must succeed")?;
    assert_eq!(
        result.pointer("/protocolVersion"),
        Some(&json!(DEFAULT_PROTOCOL_VERSION))
    );
    Ok(())
}

/// `tools/list` returns descriptors in registration order.
#[rstest]
fn tools_list_returns_planning_tools_in_order(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_message(request("tools/list", json!({}))))
        .ok_or("tools/list must be answered")?;

    let result = response.result.ok_or("tools/list must succeed")?;
    let tools = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or("tools must be an array")?;
    let names: Vec<&str> = tools
        .iter()
        .filter_map(|tool| tool.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(
        names,
        vec![
            "ask_wulang",
            "create_plan",
            "get_all_plans",
            "get_detailed_plan",
            "update_uncertainty_confidence",
            "do_research_on_uncertainty",
            "improve_plan",
            "add_todo_to_plan",
            "do_todo",
            "report_todo",
        ]
    );
    let detailed = tools
        .iter()
        .find(|tool| tool.get("name") == Some(&json!("get_detailed_plan")))
        .ok_or("get_detailed_plan must be listed")?;
    assert_eq!(detailed.pointer("/inputSchema/type"), Some(&json!("object")));
    assert_eq!(
        detailed.pointer("/inputSchema/properties/planId/type"),
        Some(&json!("integer"))
    );
    assert_eq!(
        detailed.pointer("/inputSchema/required"),
        Some(&json!(["planId"]))
    );
    Ok(())
}

/// Notifications never receive a response.
#[rstest]
#[case(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))]
#[case(json!({"jsonrpc": "2.0", "method": "tools/list"}))]
fn notifications_are_not_answered(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
    #[case] message: Value,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    assert!(rt.block_on(srv.handle_message(message)).is_none());
    Ok(())
}

/// Protocol faults map to their JSON-RPC error codes.
#[rstest]
#[case::unknown_method(request("resources/list", json!({})), -32601)]
#[case::wrong_version(json!({"jsonrpc": "1.0", "id": 7, "method": "ping"}), -32600)]
#[case::not_an_object(json!([1, 2, 3]), -32600)]
#[case::missing_params(json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call"}), -32602)]
#[case::nameless_call(request("tools/call", json!({"arguments": {}})), -32602)]
fn protocol_faults_map_to_error_codes(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
    #[case] message: Value,
    #[case] expected_code: i64,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_message(message))
        .ok_or("faulty requests must be answered")?;

    assert!(response.result.is_none());
    let error = response.error.ok_or("response must carry an error")?;
    assert_eq!(error.code, expected_code);
    Ok(())
}

/// Malformed JSON is answered with a parse error and a null id.
#[rstest]
fn malformed_json_is_a_parse_error(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_line("{\"jsonrpc\": \"2.0\", \"id\": "))
        .ok_or("parse errors must be answered")?;

    assert_eq!(response.id, Value::Null);
    assert_eq!(response.error.ok_or("response must carry an error")?.code, -32700);
    Ok(())
}

/// `ping` answers with an empty object.
#[rstest]
fn ping_answers_empty_object(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;

    let response = rt
        .block_on(srv.handle_message(request("ping", Value::Null)))
        .ok_or("ping must be answered")?;

    assert_eq!(response.result, Some(json!({})));
    Ok(())
}
