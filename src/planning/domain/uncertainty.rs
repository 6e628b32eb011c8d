//! Uncertainties attached to a plan.

use super::{Confidence, PlanId, UncertaintyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored uncertainty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uncertainty {
    /// Store-assigned identifier.
    #[serde(rename = "uncertaintyId")]
    pub id: UncertaintyId,
    /// Owning plan.
    pub plan_id: PlanId,
    /// What is not yet known.
    pub description: String,
    /// Current confidence that the uncertainty is resolved.
    pub confidence: Confidence,
    /// Planned steps to resolve it.
    pub actions_to_resolve: String,
    /// Findings recorded after research.
    pub actions_result: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// An uncertainty recorded when a plan is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUncertainty {
    /// What is not yet known.
    pub description: String,
    /// Initial confidence.
    pub confidence: Confidence,
    /// Planned steps to resolve it.
    pub actions_to_resolve: String,
}

/// Request to record research findings against an uncertainty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncertaintyAssessment {
    /// Uncertainty to update.
    pub uncertainty_id: UncertaintyId,
    /// Revised confidence.
    pub confidence: Confidence,
    /// Research findings.
    pub actions_result: String,
    /// Time the request was received.
    pub requested_at: DateTime<Utc>,
}
