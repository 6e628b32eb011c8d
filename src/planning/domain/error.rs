//! Error types for planning domain validation.

use thiserror::Error;

/// Errors returned while constructing planning domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningDomainError {
    /// A confidence score fell outside `0..=100`.
    #[error("confidence must be between 0 and 100, got {0}")]
    ConfidenceOutOfRange(i64),

    /// An identifier was not a positive integer.
    #[error("identifier must be positive, got {0}")]
    NonPositiveId(i64),

    /// A plan status string was not recognized.
    #[error("unknown plan status: {0}")]
    UnknownPlanStatus(String),

    /// A todo priority string was not recognized.
    #[error("unknown todo priority: {0}")]
    UnknownTodoPriority(String),

    /// A todo status string was not recognized.
    #[error("unknown todo status: {0}")]
    UnknownTodoStatus(String),
}
