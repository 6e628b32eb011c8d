//! Line-delimited exchange through the stdio transport loop.

use crate::in_memory::helpers::{
    TestError, TestServer, exchange, exchange_bytes, runtime, server, tool_call,
};
use rstest::rstest;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn lines(messages: &[Value]) -> String {
    messages
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn response_with_id(responses: &[Value], id: i64) -> Result<&Value, TestError> {
    Ok(responses
        .iter()
        .find(|response| response.get("id") == Some(&json!(id)))
        .ok_or_else(|| format!("no response for request {id}"))?)
}

/// Every request is answered once; notifications and blank lines are not.
#[rstest]
fn requests_are_answered_and_notifications_skipped(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;
    let input = format!(
        "{}\n\n{}\n{}\n",
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    );

    let responses = rt.block_on(exchange(srv, &input))?;

    assert_eq!(responses.len(), 2);
    let initialized = response_with_id(&responses, 1)?;
    assert!(initialized.pointer("/result/serverInfo").is_some());
    let listed = response_with_id(&responses, 2)?;
    assert_eq!(
        listed
            .pointer("/result/tools")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(10)
    );
    Ok(())
}

/// A malformed line is answered with a parse error and does not stop the loop.
#[rstest]
fn malformed_line_does_not_stop_the_loop(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;
    let input = format!(
        "not json\n{}\n",
        json!({"jsonrpc": "2.0", "id": 9, "method": "ping"})
    );

    let responses = rt.block_on(exchange(srv, &input))?;

    assert_eq!(responses.len(), 2);
    let parse_error = responses
        .iter()
        .find(|response| response.get("id") == Some(&Value::Null))
        .ok_or("parse error must be answered")?;
    assert_eq!(parse_error.pointer("/error/code"), Some(&json!(-32700)));
    assert_eq!(
        response_with_id(&responses, 9)?.get("result"),
        Some(&json!({}))
    );
    Ok(())
}

/// A line that is not UTF-8 gets a parse error and later requests still run.
#[rstest]
fn undecodable_line_is_answered_with_parse_error(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;
    let mut input = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})
        .to_string()
        .into_bytes();
    input.extend_from_slice(b"\n\xff\xfe\n");
    input.extend_from_slice(
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"})
            .to_string()
            .as_bytes(),
    );
    input.push(b'\n');

    let responses = rt.block_on(exchange_bytes(srv, &input))?;

    assert_eq!(responses.len(), 3);
    assert_eq!(response_with_id(&responses, 1)?.get("result"), Some(&json!({})));
    assert_eq!(response_with_id(&responses, 2)?.get("result"), Some(&json!({})));
    let parse_errors = responses
        .iter()
        .filter(|response| response.pointer("/error/code") == Some(&json!(-32700)))
        .count();
    assert_eq!(parse_errors, 1);
    Ok(())
}

/// Tool results travel back inside the JSON-RPC `result`.
#[rstest]
fn tool_results_are_serialized_into_responses(
    runtime: io::Result<Runtime>,
    server: Result<Arc<TestServer>, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let srv = server?;
    let question = tool_call("ask_wulang", json!({"question": "How do I ship?"}));
    let missing = tool_call("get_detailed_plan", json!({"planId": 5}));
    let question_id = question.get("id").and_then(Value::as_i64).ok_or("id")?;
    let missing_id = missing.get("id").and_then(Value::as_i64).ok_or("id")?;

    let responses = rt.block_on(exchange(srv, &lines(&[question, missing])))?;

    let guidance = response_with_id(&responses, question_id)?;
    assert_eq!(guidance.pointer("/result/isError"), Some(&json!(false)));
    assert!(
        guidance
            .pointer("/result/content/0/text")
            .and_then(Value::as_str)
            .is_some_and(|text| text.contains("How do I ship?"))
    );
    let not_found = response_with_id(&responses, missing_id)?;
    assert_eq!(
        not_found.pointer("/result/content/0/text"),
        Some(&json!("Plan not found"))
    );
    Ok(())
}
