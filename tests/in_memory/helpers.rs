//! Shared test helpers for in-memory server integration tests.

use mcp_planner::app::{Backends, build_registry};
use mcp_planner::server::{McpServer, serve};
use mcp_planner::sql::adapters::memory::ScriptedSqlExecutor;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::AsyncReadExt;
use tokio::runtime::Runtime;

/// Boxed error used as the test result type.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Server type exercised by these tests.
pub type TestServer = McpServer<DefaultClock>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a server over an empty in-memory planning store, without SQL
/// tools.
///
/// # Errors
///
/// Returns an error if tool registration fails.
#[fixture]
pub fn server() -> Result<Arc<TestServer>, TestError> {
    server_with(&Backends::in_memory())
}

/// Builds a server over the given backends.
///
/// # Errors
///
/// Returns an error if tool registration fails.
pub fn server_with(backends: &Backends) -> Result<Arc<TestServer>, TestError> {
    let registry = build_registry(backends)?;
    Ok(Arc::new(McpServer::new(registry, Arc::new(DefaultClock))))
}

/// Builds a server whose SQL tools answer from `executor`.
///
/// # Errors
///
/// Returns an error if tool registration fails.
pub fn server_with_sql(executor: ScriptedSqlExecutor) -> Result<Arc<TestServer>, TestError> {
    server_with(&Backends {
        sql: Some(Arc::new(executor)),
        ..Backends::in_memory()
    })
}

static NEXT_REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Builds a `tools/call` request with a fresh id.
#[must_use]
pub fn tool_call(name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

/// Sends a `tools/call` request and returns the decoded tool result.
///
/// # Errors
///
/// Returns an error if the server answers without a result.
pub async fn call_tool(
    server: &TestServer,
    name: &str,
    arguments: Value,
) -> Result<Value, TestError> {
    let response = server
        .handle_message(tool_call(name, arguments))
        .await
        .ok_or("tools/call must be answered")?;
    Ok(response.result.ok_or("tools/call must succeed at the protocol level")?)
}

/// Returns the first text block of a serialized tool result.
///
/// # Errors
///
/// Returns an error if the result carries no text.
pub fn result_text(result: &Value) -> Result<&str, TestError> {
    Ok(result
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .ok_or("tool result must carry text")?)
}

/// Feeds `input` to the stdio loop and returns every decoded output line.
///
/// # Errors
///
/// Returns an error if the transport fails or emits invalid JSON.
pub async fn exchange(server: Arc<TestServer>, input: &str) -> Result<Vec<Value>, TestError> {
    exchange_bytes(server, input.as_bytes()).await
}

/// Feeds raw `input`, which need not be UTF-8, to the stdio loop.
///
/// # Errors
///
/// Returns an error if the transport fails or emits invalid JSON.
pub async fn exchange_bytes(
    server: Arc<TestServer>,
    input: &[u8],
) -> Result<Vec<Value>, TestError> {
    let (writer, mut reader) = tokio::io::duplex(1 << 16);
    serve(server, input, writer).await?;
    let mut output = String::new();
    reader.read_to_string(&mut output).await?;
    output
        .lines()
        .map(|line| serde_json::from_str(line).map_err(TestError::from))
        .collect()
}
