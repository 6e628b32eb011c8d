//! Tool declarations: name, description, input schema, and handler.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use super::{InputSchema, ToolError, ToolOutput, ToolRegistrationError, ValidatedArgs};

/// Maximum tool name length accepted by MCP clients.
const MAX_TOOL_NAME_LENGTH: usize = 64;

/// `errorType` reported when validated input cannot be decoded into the
/// handler's input type.
pub const INPUT_DECODE_ERROR_KIND: &str = "InputDecodeError";

/// Per-call metadata handed to every handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CallContext {
    call_id: Uuid,
    request_id: Option<Value>,
    received_at: DateTime<Utc>,
    meta: Map<String, Value>,
}

impl CallContext {
    /// Creates a context stamped with the current time from `clock`.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        Self::received_at(clock.utc())
    }

    /// Creates a context stamped with an explicit receipt time.
    #[must_use]
    pub fn received_at(received_at: DateTime<Utc>) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            request_id: None,
            received_at,
            meta: Map::new(),
        }
    }

    /// Records the transport-level request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Value) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Records client-supplied call metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    /// Returns the generated call identifier.
    #[must_use]
    pub const fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Returns the transport-level request identifier.
    #[must_use]
    pub const fn request_id(&self) -> Option<&Value> {
        self.request_id.as_ref()
    }

    /// Returns when the call arrived.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Returns client-supplied call metadata.
    #[must_use]
    pub const fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }
}

/// An inbound call as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    tool_name: String,
    arguments: Value,
    context: CallContext,
}

impl RawCall {
    /// Creates a call for `tool_name` with an untrusted argument bag.
    #[must_use]
    pub fn new(tool_name: impl Into<String>, arguments: Value, context: CallContext) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            context,
        }
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the untrusted argument bag.
    #[must_use]
    pub const fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// Returns the call context.
    #[must_use]
    pub const fn context(&self) -> &CallContext {
        &self.context
    }

    /// Splits the call into its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, Value, CallContext) {
        (self.tool_name, self.arguments, self.context)
    }
}

/// User-supplied tool logic operating on validated input.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for any execution fault; the envelope converts it
    /// into an `isError` result.
    async fn call(&self, args: ValidatedArgs, context: CallContext)
    -> Result<ToolOutput, ToolError>;
}

/// Adapts an async function over a typed input into a [`ToolHandler`].
pub struct FnHandler<T, F> {
    handler: F,
    input: PhantomData<fn() -> T>,
}

impl<T, F> FnHandler<T, F> {
    /// Wraps `handler`.
    #[must_use]
    pub const fn new(handler: F) -> Self {
        Self {
            handler,
            input: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, Fut, O> ToolHandler for FnHandler<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(T, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    async fn call(
        &self,
        args: ValidatedArgs,
        context: CallContext,
    ) -> Result<ToolOutput, ToolError> {
        let input = args.deserialize::<T>().map_err(|err| {
            ToolError::new(
                INPUT_DECODE_ERROR_KIND,
                format!("validated arguments do not match handler input: {err}"),
            )
        })?;
        let output = (self.handler)(input, context).await?;
        Ok(output.into())
    }
}

/// A finished tool: immutable declaration plus shared handler.
#[derive(Clone)]
pub struct ToolSpec {
    name: String,
    description: String,
    schema: InputSchema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolSpec {
    /// Declares a tool from its four parts.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistrationError`] when the name or description is
    /// invalid or the schema definition is malformed.
    pub fn new(
        raw_name: impl Into<String>,
        raw_description: impl Into<String>,
        schema: InputSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self, ToolRegistrationError> {
        let requested_name: String = raw_name.into();
        let name = validate_tool_name(&requested_name)?;
        let description = raw_description.into().trim().to_owned();
        if description.is_empty() {
            return Err(ToolRegistrationError::MissingDescription(name));
        }
        schema
            .check_definition()
            .map_err(|source| ToolRegistrationError::InvalidSchema {
                tool: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            description,
            schema,
            handler,
        })
    }

    /// Declares a tool whose handler is an async function over typed input.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistrationError`] under the same conditions as
    /// [`ToolSpec::new`].
    pub fn from_fn<T, F, Fut, O>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: InputSchema,
        handler: F,
    ) -> Result<Self, ToolRegistrationError>
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(T, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
        O: Into<ToolOutput> + Send + 'static,
    {
        Self::new(
            name,
            description,
            schema,
            Arc::new(FnHandler::<T, F>::new(handler)),
        )
    }

    /// Starts an incremental declaration.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            description: None,
            schema: None,
            handler: None,
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn schema(&self) -> &InputSchema {
        &self.schema
    }

    /// Returns the shared handler.
    #[must_use]
    pub fn handler(&self) -> &dyn ToolHandler {
        self.handler.as_ref()
    }

    /// Returns the discovery view of this tool.
    #[must_use]
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.schema.to_json_schema(),
        }
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Object-shaped tool declaration assembled field by field.
#[must_use]
pub struct ToolSpecBuilder {
    name: String,
    description: Option<String>,
    schema: Option<InputSchema>,
    handler: Option<Arc<dyn ToolHandler>>,
}

impl ToolSpecBuilder {
    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn schema(mut self, schema: InputSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the handler.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Finishes the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistrationError`] when any part is missing or invalid.
    pub fn build(self) -> Result<ToolSpec, ToolRegistrationError> {
        let name = validate_tool_name(&self.name)?;
        let description = self
            .description
            .ok_or_else(|| ToolRegistrationError::MissingDescription(name.clone()))?;
        let schema = self
            .schema
            .ok_or_else(|| ToolRegistrationError::MissingSchema(name.clone()))?;
        let handler = self
            .handler
            .ok_or_else(|| ToolRegistrationError::MissingHandler(name.clone()))?;
        ToolSpec::new(name, description, schema, handler)
    }
}

/// Discovery view of a tool as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for the arguments.
    pub input_schema: Value,
}

fn validate_tool_name(raw: &str) -> Result<String, ToolRegistrationError> {
    let name = raw.trim().to_owned();
    if name.is_empty() {
        return Err(ToolRegistrationError::EmptyToolName);
    }
    let is_valid = name.chars().all(|character| {
        character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
    });
    if !is_valid {
        return Err(ToolRegistrationError::InvalidToolName(name));
    }
    if name.len() > MAX_TOOL_NAME_LENGTH {
        return Err(ToolRegistrationError::ToolNameTooLong(name));
    }
    Ok(name)
}
