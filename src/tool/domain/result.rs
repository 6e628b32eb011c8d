//! The normalized response shape returned for every tool call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SchemaViolation;

/// `errorType` reported when arguments fail schema validation.
pub const VALIDATION_ERROR_KIND: &str = "ValidationError";

/// A single block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text payload.
        text: String,
    },
}

impl ContentBlock {
    /// Creates a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the text payload when this is a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }
}

/// Diagnostic metadata attached to a tool result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Failure classification, e.g. `ValidationError`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Per-field validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<SchemaViolation>,
    /// Time the call was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Diagnostic trace for execution faults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Additional tool-specific entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultMetadata {
    /// Creates metadata stamped with `timestamp`.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Sets the failure classification.
    #[must_use]
    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Adds a tool-specific entry.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Normalized outcome of a tool call, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Ordered output blocks.
    pub content: Vec<ContentBlock>,
    /// Whether the call failed.
    #[serde(default)]
    pub is_error: bool,
    /// Optional diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResultMetadata>,
}

impl ToolResult {
    /// A successful result carrying one text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
            metadata: None,
        }
    }

    /// A failed result carrying one text block and no metadata.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
            metadata: None,
        }
    }

    /// A failed result carrying one text block and stamped metadata.
    #[must_use]
    pub fn error(message: impl Into<String>, metadata: ResultMetadata) -> Self {
        Self::failure(message).with_metadata(metadata)
    }

    /// Builds the result reported for arguments that fail validation.
    #[must_use]
    pub fn validation_failure(violations: Vec<SchemaViolation>, timestamp: DateTime<Utc>) -> Self {
        let summary = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let metadata = ResultMetadata {
            validation_errors: violations,
            ..ResultMetadata::at(timestamp).with_error_type(VALIDATION_ERROR_KIND)
        };
        Self::error(summary, metadata)
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ResultMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the first text block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }

    /// Returns the failure classification, if any.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.error_type.as_deref())
    }
}

/// What a handler may hand back to the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// Plain text, wrapped into a successful [`ToolResult`].
    Text(String),
    /// A fully formed result, passed through unchanged.
    Structured(ToolResult),
    /// No result at all; the envelope reports this as a fault.
    Empty,
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<ToolResult> for ToolOutput {
    fn from(result: ToolResult) -> Self {
        Self::Structured(result)
    }
}

impl From<()> for ToolOutput {
    fn from((): ()) -> Self {
        Self::Empty
    }
}
