//! Tool registration and name-based dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, info_span, warn};

use super::envelope;
use crate::tool::domain::{
    InputSchema, RawCall, ResultMetadata, ToolDescriptor, ToolHandler, ToolRegistrationError,
    ToolResult, ToolSpec,
};

/// `errorType` reported when a call names a tool that is not registered.
pub const UNKNOWN_TOOL_KIND: &str = "UnknownTool";

/// Anything that yields one or more finished tools.
pub trait IntoToolSpecs {
    /// Converts into the tools to register, in order.
    fn into_tool_specs(self) -> Vec<ToolSpec>;
}

impl IntoToolSpecs for ToolSpec {
    fn into_tool_specs(self) -> Vec<ToolSpec> {
        vec![self]
    }
}

impl IntoToolSpecs for Vec<ToolSpec> {
    fn into_tool_specs(self) -> Vec<ToolSpec> {
        self
    }
}

impl<const N: usize> IntoToolSpecs for [ToolSpec; N] {
    fn into_tool_specs(self) -> Vec<ToolSpec> {
        self.into()
    }
}

/// Collects tools before the table is frozen.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<ToolSpec>,
}

impl ToolRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one or many self-describing tools.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistrationError::DuplicateTool`] when a name is already
    /// taken. Tools earlier in the batch stay registered.
    pub fn register(
        &mut self,
        tools: impl IntoToolSpecs,
    ) -> Result<&mut Self, ToolRegistrationError> {
        for spec in tools.into_tool_specs() {
            self.insert(spec)?;
        }
        Ok(self)
    }

    /// Registers a tool from its positional parts.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistrationError`] when the name, description, or schema
    /// is invalid, or when the name is already taken.
    pub fn register_parts(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: InputSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<&mut Self, ToolRegistrationError> {
        let spec = ToolSpec::new(name, description, schema, handler)?;
        self.insert(spec)?;
        Ok(self)
    }

    fn insert(&mut self, spec: ToolSpec) -> Result<(), ToolRegistrationError> {
        if self.tools.iter().any(|existing| existing.name() == spec.name()) {
            return Err(ToolRegistrationError::DuplicateTool(spec.name().to_owned()));
        }
        self.tools.push(spec);
        Ok(())
    }

    /// Freezes the table.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        let index = self
            .tools
            .iter()
            .enumerate()
            .map(|(position, spec)| (spec.name().to_owned(), position))
            .collect();
        ToolRegistry {
            inner: Arc::new(RegistryInner {
                tools: self.tools,
                index,
            }),
        }
    }
}

#[derive(Debug)]
struct RegistryInner {
    tools: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

/// Immutable name to tool table. Clones share the same table.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    inner: Arc<RegistryInner>,
}

impl ToolRegistry {
    /// Starts a new registry.
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.inner
            .index
            .get(name)
            .and_then(|position| self.inner.tools.get(*position))
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tools.len()
    }

    /// Returns whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tools.is_empty()
    }

    /// Lists tools in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.inner.tools.iter().map(ToolSpec::descriptor).collect()
    }

    /// Routes a call to its tool. Always yields exactly one result.
    pub async fn dispatch(&self, call: RawCall) -> ToolResult {
        let (tool_name, arguments, context) = call.into_parts();
        let span = info_span!("tool_call", tool = %tool_name, call_id = %context.call_id());
        let Some(spec) = self.get(&tool_name) else {
            span.in_scope(|| warn!("call for unregistered tool"));
            return ToolResult::error(
                format!("Unknown tool: {tool_name}"),
                ResultMetadata::at(context.timestamp()).with_error_type(UNKNOWN_TOOL_KIND),
            );
        };
        envelope::invoke(spec, &arguments, context)
            .instrument(span)
            .await
    }
}
