//! The invocation envelope: validate, run, and normalize a single tool call.
//!
//! [`invoke`] never fails. Validation failures, handler errors, panics, and
//! empty results are all folded into an `isError` [`ToolResult`].

use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, warn};

use crate::tool::domain::{
    CallContext, ResultMetadata, ToolError, ToolOutput, ToolResult, ToolSpec,
};

/// `errorType` reported when a handler produces no output.
pub const EMPTY_RESULT_KIND: &str = "EmptyResult";

/// Runs `spec` against an untrusted argument bag.
///
/// The handler is only invoked when `raw_arguments` satisfies the tool's
/// schema.
pub async fn invoke(spec: &ToolSpec, raw_arguments: &Value, context: CallContext) -> ToolResult {
    let timestamp = context.timestamp();
    let args = match spec.schema().validate(raw_arguments) {
        Ok(args) => args,
        Err(violations) => {
            warn!(
                tool = spec.name(),
                violations = violations.len(),
                "tool arguments failed validation"
            );
            return ToolResult::validation_failure(violations, timestamp);
        }
    };

    let outcome = AssertUnwindSafe(spec.handler().call(args, context))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ToolError::from_panic(payload.as_ref())));

    match outcome {
        Ok(ToolOutput::Text(text)) => {
            debug!(tool = spec.name(), "tool call succeeded");
            ToolResult::text(text)
        }
        Ok(ToolOutput::Structured(result)) => {
            debug!(
                tool = spec.name(),
                is_error = result.is_error,
                "tool call returned a structured result"
            );
            result
        }
        Ok(ToolOutput::Empty) => fault_result(
            spec.name(),
            &ToolError::new(EMPTY_RESULT_KIND, "handler returned no result"),
            timestamp,
        ),
        Err(fault) => fault_result(spec.name(), &fault, timestamp),
    }
}

fn fault_result(
    tool: &str,
    fault: &ToolError,
    timestamp: chrono::DateTime<chrono::Utc>,
) -> ToolResult {
    error!(tool, kind = fault.kind(), error = %fault, "tool call failed");
    let metadata = ResultMetadata {
        stack: fault.stack(),
        ..ResultMetadata::at(timestamp).with_error_type(fault.kind())
    };
    ToolResult::error(format!("Error in tool {tool}: {}", fault.message()), metadata)
}
