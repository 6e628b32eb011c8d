//! Invocation and registration services for tools.

pub mod envelope;
mod registry;

pub use envelope::{EMPTY_RESULT_KIND, invoke};
pub use registry::{IntoToolSpecs, ToolRegistry, ToolRegistryBuilder, UNKNOWN_TOOL_KIND};
