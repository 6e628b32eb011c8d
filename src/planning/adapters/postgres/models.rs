//! Diesel row models for planning persistence.

use super::schema::{plans, todos, uncertainties};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for plans.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanRow {
    /// Store-assigned identifier.
    pub plan_id: i64,
    /// Short plan name.
    pub name: String,
    /// Detailed description.
    pub description: String,
    /// Lifecycle state.
    pub status: String,
    /// Overall confidence.
    pub confident: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for plans.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct NewPlanRow {
    /// Short plan name.
    pub name: String,
    /// Detailed description.
    pub description: String,
    /// Lifecycle state.
    pub status: String,
    /// Overall confidence.
    pub confident: i16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for uncertainties.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = uncertainties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UncertaintyRow {
    /// Store-assigned identifier.
    pub uncertainty_id: i64,
    /// Owning plan.
    pub plan_id: i64,
    /// What is not yet known.
    pub description: String,
    /// Confidence.
    pub confidence: i16,
    /// Planned resolution steps.
    pub actions_to_resolve: String,
    /// Research findings.
    pub actions_result: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for uncertainties.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = uncertainties)]
pub struct NewUncertaintyRow {
    /// Owning plan.
    pub plan_id: i64,
    /// What is not yet known.
    pub description: String,
    /// Confidence.
    pub confidence: i16,
    /// Planned resolution steps.
    pub actions_to_resolve: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for todos.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    /// Store-assigned identifier.
    pub todo_id: i64,
    /// Owning plan.
    pub plan_id: i64,
    /// What to do.
    pub description: String,
    /// Urgency.
    pub priority: String,
    /// Progress.
    pub status: String,
    /// Outcome report.
    pub report: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for todos.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub struct NewTodoRow {
    /// Owning plan.
    pub plan_id: i64,
    /// What to do.
    pub description: String,
    /// Urgency.
    pub priority: String,
    /// Progress.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
