//! Error types for tool registration and tool execution.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use thiserror::Error;

/// Classification used when a fault carries no better description.
pub const UNKNOWN_ERROR_KIND: &str = "UnknownError";

/// Errors raised while checking a schema definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaDefinitionError {
    /// A field name is empty after trimming.
    #[error("field name must not be empty (under '{0}')")]
    EmptyFieldName(String),

    /// The same field name is declared twice in one object.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// An enum field declares no options.
    #[error("enum field '{0}' must declare at least one option")]
    EmptyEnum(String),

    /// Numeric bounds were attached to a non-numeric field.
    #[error("field '{0}' declares numeric bounds but is not numeric")]
    BoundsOnNonNumericField(String),

    /// The lower bound exceeds the upper bound.
    #[error("field '{0}' declares a minimum greater than its maximum")]
    InvertedBounds(String),

    /// The default value does not satisfy its own field constraint.
    #[error("default value for field '{0}' violates the field constraint")]
    InvalidDefault(String),
}

/// Configuration faults raised while declaring or registering tools.
///
/// These surface at startup and are never folded into a tool result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistrationError {
    /// The tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The tool name contains characters outside `[a-z0-9_]`.
    #[error(
        "tool name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidToolName(String),

    /// The tool name exceeds the protocol limit.
    #[error("tool name exceeds 64 character limit: {0}")]
    ToolNameTooLong(String),

    /// The description is empty after trimming.
    #[error("tool '{0}' must have a description")]
    MissingDescription(String),

    /// No input schema was supplied.
    #[error("tool '{0}' must declare an input schema")]
    MissingSchema(String),

    /// No handler was supplied.
    #[error("tool '{0}' must have a handler")]
    MissingHandler(String),

    /// The input schema is malformed.
    #[error("tool '{tool}' declares an invalid input schema: {source}")]
    InvalidSchema {
        /// Tool name.
        tool: String,
        /// Schema problem.
        #[source]
        source: SchemaDefinitionError,
    },

    /// A tool with the same name is already registered.
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Fault raised by a tool handler while doing its work.
///
/// Any `std::error::Error` converts into a `ToolError` with `?`; the error's
/// type name becomes its classification. The envelope turns every
/// `ToolError` into an `isError` result.
#[derive(Debug)]
pub struct ToolError {
    kind: String,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    backtrace: Backtrace,
}

impl ToolError {
    /// Creates a fault with an explicit classification.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            source: None,
            backtrace: Backtrace::capture(),
        }
    }

    /// Wraps an error, classifying it by its type name.
    #[must_use]
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: short_type_name::<E>().to_owned(),
            message: error.to_string(),
            source: Some(Box::new(error)),
            backtrace: Backtrace::capture(),
        }
    }

    /// Builds a fault from a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_owned());
        Self::new("Panic", message)
    }

    /// Overrides the classification.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Returns the classification, e.g. `PlanningRepositoryError`.
    #[must_use]
    pub fn kind(&self) -> &str {
        if self.kind.trim().is_empty() {
            UNKNOWN_ERROR_KIND
        } else {
            &self.kind
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a diagnostic trace: the source chain and, when captured, the
    /// backtrace.
    #[must_use]
    pub fn stack(&self) -> Option<String> {
        let mut lines = Vec::new();
        let mut cause = self.source.as_deref().and_then(|error| error.source());
        while let Some(error) = cause {
            lines.push(format!("caused by: {error}"));
            cause = error.source();
        }
        if self.backtrace.status() == BacktraceStatus::Captured {
            lines.push(self.backtrace.to_string());
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl<E> From<E> for ToolError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::from_error(error)
    }
}

fn short_type_name<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
