//! Domain model for declared tools and their normalized results.
//!
//! A tool is a name, a description, an [`InputSchema`], and a
//! [`ToolHandler`]. Validation, execution faults, and results are modelled
//! here; invocation and registration live in the services layer.

mod error;
mod result;
mod schema;
mod spec;

pub use error::{SchemaDefinitionError, ToolError, ToolRegistrationError, UNKNOWN_ERROR_KIND};
pub use result::{ContentBlock, ResultMetadata, ToolOutput, ToolResult, VALIDATION_ERROR_KIND};
pub use schema::{
    FieldKind, FieldSchema, InputSchema, SchemaViolation, UnknownFieldPolicy, ValidatedArgs,
};
pub use spec::{
    CallContext, FnHandler, INPUT_DECODE_ERROR_KIND, RawCall, ToolDescriptor, ToolHandler,
    ToolSpec, ToolSpecBuilder,
};
