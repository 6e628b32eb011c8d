//! Plans and the aggregate view returned by detailed lookups.

use super::{Confidence, NewUncertainty, PlanId, PlanningDomainError, Todo, Uncertainty};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Plan is being worked on.
    #[default]
    Active,
    /// Plan has been carried out.
    Completed,
    /// Plan is no longer relevant.
    Archived,
}

impl PlanStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl TryFrom<&str> for PlanStatus {
    type Error = PlanningDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "ARCHIVED" => Ok(Self::Archived),
            _ => Err(PlanningDomainError::UnknownPlanStatus(value.to_owned())),
        }
    }
}

/// A stored plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Store-assigned identifier.
    #[serde(rename = "planId")]
    pub id: PlanId,
    /// Short plan name.
    pub name: String,
    /// Detailed description, revised as uncertainties resolve.
    pub description: String,
    /// Lifecycle state.
    pub status: PlanStatus,
    /// Overall confidence in the plan.
    pub confident: Confidence,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Request to create a plan together with its initial uncertainties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlan {
    /// Short plan name.
    pub name: String,
    /// Detailed description.
    pub description: String,
    /// Overall confidence in the plan.
    pub confident: Confidence,
    /// Uncertainties recorded with the plan.
    pub uncertainties: Vec<NewUncertainty>,
    /// Time the request was received.
    pub requested_at: DateTime<Utc>,
}

/// Request to replace a plan's description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRevision {
    /// Plan to revise.
    pub plan_id: PlanId,
    /// Improved description.
    pub description: String,
    /// Time the request was received.
    pub requested_at: DateTime<Utc>,
}

/// A plan with its uncertainties and todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDetail {
    /// The plan itself.
    pub plan: Plan,
    /// Todos ordered by identifier.
    pub todos: Vec<Todo>,
    /// Uncertainties ordered by identifier.
    pub uncertainties: Vec<Uncertainty>,
}
