//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mcp_planner::app::{Backends, build_registry};
use mcp_planner::database::{PgPool, connect_pool};
use mcp_planner::server::McpServer;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Boxed error used as the test result type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the disposable test database.
pub const TEST_DATABASE_URL_ENV: &str = "PLANNER_TEST_DATABASE_URL";

/// SQL to create the planning tables.
pub const CREATE_PLANNING_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_planning_tables/up.sql");

/// SQL to drop the planning tables.
pub const DROP_PLANNING_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_planning_tables/down.sql");

static DATABASE_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// A freshly migrated database reserved for one test.
pub struct PreparedDatabase {
    /// Pool over the test database.
    pub pool: PgPool,
    _lock: MutexGuard<'static, ()>,
}

impl PreparedDatabase {
    /// Builds a server whose planning and SQL tools share this pool.
    ///
    /// # Errors
    ///
    /// Returns an error if tool registration fails.
    pub fn server(&self) -> Result<Arc<McpServer<DefaultClock>>, BoxError> {
        let registry = build_registry(&Backends::postgres(&self.pool))?;
        Ok(Arc::new(McpServer::new(registry, Arc::new(DefaultClock))))
    }
}

/// Resets the planning tables and opens a pool, or yields `None` when no
/// test database is configured.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
#[fixture]
pub fn prepared_database() -> Result<Option<PreparedDatabase>, BoxError> {
    let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let lock = DATABASE_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let mut conn = PgConnection::establish(&url)?;
    conn.batch_execute(DROP_PLANNING_TABLES_SQL)?;
    conn.batch_execute(CREATE_PLANNING_TABLES_SQL)?;

    let pool = connect_pool(&url, 2)?;
    Ok(Some(PreparedDatabase { pool, _lock: lock }))
}

/// Sends a `tools/call` request and returns the decoded tool result.
///
/// # Errors
///
/// Returns an error if the server answers without a result.
pub async fn call_tool(
    server: &McpServer<DefaultClock>,
    name: &str,
    arguments: Value,
) -> Result<Value, BoxError> {
    let response = server
        .handle_message(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }))
        .await
        .ok_or("tools/call must be answered")?;
    Ok(response.result.ok_or("tools/call must succeed at the protocol level")?)
}

/// Returns the first text block of a serialized tool result.
///
/// # Errors
///
/// Returns an error if the result carries no text.
pub fn result_text(result: &Value) -> Result<&str, BoxError> {
    Ok(result
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .ok_or("tool result must carry text")?)
}
