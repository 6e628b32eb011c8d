//! Todos: the executable steps of a plan.

use super::{PlanId, PlanningDomainError, TodoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Todo urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Do first.
    High,
}

impl TodoPriority {
    /// All priorities in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl TryFrom<&str> for TodoPriority {
    type Error = PlanningDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(PlanningDomainError::UnknownTodoPriority(value.to_owned())),
        }
    }
}

/// Todo progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TodoStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl TryFrom<&str> for TodoStatus {
    type Error = PlanningDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(PlanningDomainError::UnknownTodoStatus(value.to_owned())),
        }
    }
}

/// A stored todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned identifier.
    #[serde(rename = "todoId")]
    pub id: TodoId,
    /// Owning plan.
    pub plan_id: PlanId,
    /// What to do.
    pub description: String,
    /// Urgency.
    pub priority: TodoPriority,
    /// Progress.
    pub status: TodoStatus,
    /// Outcome report, once the todo is reported.
    pub report: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Request to add a todo to an existing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Owning plan.
    pub plan_id: PlanId,
    /// What to do.
    pub description: String,
    /// Urgency.
    pub priority: TodoPriority,
    /// Initial progress.
    pub status: TodoStatus,
    /// Time the request was received.
    pub requested_at: DateTime<Utc>,
}

/// Request to record the outcome of a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoReport {
    /// Todo to update.
    pub todo_id: TodoId,
    /// New progress.
    pub status: TodoStatus,
    /// Outcome report.
    pub report: String,
    /// Time the request was received.
    pub requested_at: DateTime<Utc>,
}
