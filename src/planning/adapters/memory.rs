//! In-memory planning repository.

use crate::planning::{
    domain::{
        NewPlan, NewTodo, Plan, PlanDetail, PlanId, PlanRevision, PlanStatus, Todo, TodoId,
        TodoReport, Uncertainty, UncertaintyAssessment, UncertaintyId,
    },
    ports::{PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory planning repository.
///
/// Identifiers are assigned from per-table counters starting at 1, matching
/// database sequence behaviour.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningRepository {
    state: Arc<RwLock<InMemoryPlanningState>>,
}

#[derive(Debug, Default)]
struct InMemoryPlanningState {
    plans: BTreeMap<PlanId, Plan>,
    uncertainties: BTreeMap<UncertaintyId, Uncertainty>,
    todos: BTreeMap<TodoId, Todo>,
    last_plan_id: i64,
    last_uncertainty_id: i64,
    last_todo_id: i64,
}

impl InMemoryPlanningRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PlanningRepositoryResult<RwLockReadGuard<'_, InMemoryPlanningState>> {
        self.state.read().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> PlanningRepositoryResult<RwLockWriteGuard<'_, InMemoryPlanningState>> {
        self.state.write().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn next_id<T>(
    counter: &mut i64,
    wrap: impl FnOnce(i64) -> Result<T, crate::planning::domain::PlanningDomainError>,
) -> PlanningRepositoryResult<T> {
    *counter += 1;
    wrap(*counter).map_err(PlanningRepositoryError::persistence)
}

#[async_trait]
impl PlanningRepository for InMemoryPlanningRepository {
    async fn create_plan(&self, plan: NewPlan) -> PlanningRepositoryResult<Plan> {
        let mut state = self.write()?;
        let NewPlan {
            name,
            description,
            confident,
            uncertainties,
            requested_at,
        } = plan;

        let plan_id = next_id(&mut state.last_plan_id, PlanId::new)?;
        let stored = Plan {
            id: plan_id,
            name,
            description,
            status: PlanStatus::Active,
            confident,
            created_at: requested_at,
            updated_at: requested_at,
        };
        state.plans.insert(plan_id, stored.clone());

        for uncertainty in uncertainties {
            let uncertainty_id = next_id(&mut state.last_uncertainty_id, UncertaintyId::new)?;
            state.uncertainties.insert(
                uncertainty_id,
                Uncertainty {
                    id: uncertainty_id,
                    plan_id,
                    description: uncertainty.description,
                    confidence: uncertainty.confidence,
                    actions_to_resolve: uncertainty.actions_to_resolve,
                    actions_result: None,
                    created_at: requested_at,
                    updated_at: requested_at,
                },
            );
        }
        Ok(stored)
    }

    async fn active_plans(&self) -> PlanningRepositoryResult<Vec<Plan>> {
        let state = self.read()?;
        Ok(state
            .plans
            .values()
            .filter(|plan| plan.status == PlanStatus::Active)
            .cloned()
            .collect())
    }

    async fn plan_detail(&self, plan_id: PlanId) -> PlanningRepositoryResult<Option<PlanDetail>> {
        let state = self.read()?;
        let Some(plan) = state.plans.get(&plan_id).cloned() else {
            return Ok(None);
        };
        let todos = state
            .todos
            .values()
            .filter(|todo| todo.plan_id == plan_id)
            .cloned()
            .collect();
        let uncertainties = state
            .uncertainties
            .values()
            .filter(|uncertainty| uncertainty.plan_id == plan_id)
            .cloned()
            .collect();
        Ok(Some(PlanDetail {
            plan,
            todos,
            uncertainties,
        }))
    }

    async fn revise_plan(&self, revision: PlanRevision) -> PlanningRepositoryResult<Option<Plan>> {
        let mut state = self.write()?;
        Ok(state.plans.get_mut(&revision.plan_id).map(|plan| {
            plan.description = revision.description;
            plan.updated_at = revision.requested_at;
            plan.clone()
        }))
    }

    async fn find_uncertainty(
        &self,
        uncertainty_id: UncertaintyId,
    ) -> PlanningRepositoryResult<Option<Uncertainty>> {
        let state = self.read()?;
        Ok(state.uncertainties.get(&uncertainty_id).cloned())
    }

    async fn assess_uncertainty(
        &self,
        assessment: UncertaintyAssessment,
    ) -> PlanningRepositoryResult<Option<Uncertainty>> {
        let mut state = self.write()?;
        Ok(state
            .uncertainties
            .get_mut(&assessment.uncertainty_id)
            .map(|uncertainty| {
                uncertainty.confidence = assessment.confidence;
                uncertainty.actions_result = Some(assessment.actions_result);
                uncertainty.updated_at = assessment.requested_at;
                uncertainty.clone()
            }))
    }

    async fn add_todo(&self, todo: NewTodo) -> PlanningRepositoryResult<Todo> {
        let mut state = self.write()?;
        if !state.plans.contains_key(&todo.plan_id) {
            return Err(PlanningRepositoryError::PlanNotFound(todo.plan_id));
        }
        let todo_id = next_id(&mut state.last_todo_id, TodoId::new)?;
        let stored = Todo {
            id: todo_id,
            plan_id: todo.plan_id,
            description: todo.description,
            priority: todo.priority,
            status: todo.status,
            report: None,
            created_at: todo.requested_at,
            updated_at: todo.requested_at,
        };
        state.todos.insert(todo_id, stored.clone());
        Ok(stored)
    }

    async fn find_todo(&self, todo_id: TodoId) -> PlanningRepositoryResult<Option<Todo>> {
        let state = self.read()?;
        Ok(state.todos.get(&todo_id).cloned())
    }

    async fn report_todo(&self, report: TodoReport) -> PlanningRepositoryResult<Option<Todo>> {
        let mut state = self.write()?;
        Ok(state.todos.get_mut(&report.todo_id).map(|todo| {
            todo.status = report.status;
            todo.report = Some(report.report);
            todo.updated_at = report.requested_at;
            todo.clone()
        }))
    }
}
