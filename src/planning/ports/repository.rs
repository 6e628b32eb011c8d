//! Repository port for plan, uncertainty, and todo persistence.

use crate::planning::domain::{
    NewPlan, NewTodo, Plan, PlanDetail, PlanId, PlanRevision, Todo, TodoId, TodoReport,
    Uncertainty, UncertaintyAssessment, UncertaintyId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning repository operations.
pub type PlanningRepositoryResult<T> = Result<T, PlanningRepositoryError>;

/// Persistence contract for planning records.
///
/// Lookups and updates of a missing record return `Ok(None)`; absence is an
/// ordinary outcome, not a failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanningRepository: Send + Sync {
    /// Stores a new `ACTIVE` plan and its uncertainties atomically.
    async fn create_plan(&self, plan: NewPlan) -> PlanningRepositoryResult<Plan>;

    /// Returns every `ACTIVE` plan ordered by identifier.
    async fn active_plans(&self) -> PlanningRepositoryResult<Vec<Plan>>;

    /// Returns a plan with its uncertainties and todos.
    async fn plan_detail(&self, plan_id: PlanId) -> PlanningRepositoryResult<Option<PlanDetail>>;

    /// Replaces a plan's description.
    async fn revise_plan(&self, revision: PlanRevision) -> PlanningRepositoryResult<Option<Plan>>;

    /// Finds an uncertainty by identifier.
    async fn find_uncertainty(
        &self,
        uncertainty_id: UncertaintyId,
    ) -> PlanningRepositoryResult<Option<Uncertainty>>;

    /// Records research findings and a revised confidence.
    async fn assess_uncertainty(
        &self,
        assessment: UncertaintyAssessment,
    ) -> PlanningRepositoryResult<Option<Uncertainty>>;

    /// Adds a todo to an existing plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::PlanNotFound`] when the plan does
    /// not exist.
    async fn add_todo(&self, todo: NewTodo) -> PlanningRepositoryResult<Todo>;

    /// Finds a todo by identifier.
    async fn find_todo(&self, todo_id: TodoId) -> PlanningRepositoryResult<Option<Todo>>;

    /// Records a todo's outcome and status.
    async fn report_todo(&self, report: TodoReport) -> PlanningRepositoryResult<Option<Todo>>;
}

/// Errors returned by planning repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanningRepositoryError {
    /// The referenced plan does not exist.
    #[error("plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted planning data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanningRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
