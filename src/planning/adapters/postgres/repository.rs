//! `PostgreSQL` repository implementation for planning records.

use super::{
    models::{NewPlanRow, NewTodoRow, NewUncertaintyRow, PlanRow, TodoRow, UncertaintyRow},
    schema::{plans, todos, uncertainties},
};
use crate::database::PgPool;
use crate::planning::{
    domain::{
        Confidence, NewPlan, NewTodo, Plan, PlanDetail, PlanId, PlanRevision, PlanStatus, Todo,
        TodoId, TodoPriority, TodoReport, TodoStatus, Uncertainty, UncertaintyAssessment,
        UncertaintyId,
    },
    ports::{PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed repository for plans, uncertainties, and todos.
#[derive(Debug, Clone)]
pub struct PostgresPlanningRepository {
    pool: PgPool,
}

impl PostgresPlanningRepository {
    /// Creates a new repository from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> PlanningRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanningRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PlanningRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(PlanningRepositoryError::persistence)?
    }
}

#[async_trait]
impl PlanningRepository for PostgresPlanningRepository {
    async fn create_plan(&self, plan: NewPlan) -> PlanningRepositoryResult<Plan> {
        let plan_row = NewPlanRow {
            name: plan.name,
            description: plan.description,
            status: PlanStatus::Active.as_str().to_owned(),
            confident: confidence_to_column(plan.confident),
            created_at: plan.requested_at,
            updated_at: plan.requested_at,
        };
        let pending_uncertainties = plan.uncertainties;
        let requested_at = plan.requested_at;

        self.run_blocking(move |connection| {
            let stored = connection
                .transaction::<_, DieselError, _>(|transaction| {
                    let inserted = diesel::insert_into(plans::table)
                        .values(&plan_row)
                        .returning(PlanRow::as_returning())
                        .get_result::<PlanRow>(transaction)?;
                    let uncertainty_rows: Vec<NewUncertaintyRow> = pending_uncertainties
                        .into_iter()
                        .map(|uncertainty| NewUncertaintyRow {
                            plan_id: inserted.plan_id,
                            description: uncertainty.description,
                            confidence: confidence_to_column(uncertainty.confidence),
                            actions_to_resolve: uncertainty.actions_to_resolve,
                            created_at: requested_at,
                            updated_at: requested_at,
                        })
                        .collect();
                    if !uncertainty_rows.is_empty() {
                        diesel::insert_into(uncertainties::table)
                            .values(&uncertainty_rows)
                            .execute(transaction)?;
                    }
                    Ok(inserted)
                })
                .map_err(PlanningRepositoryError::persistence)?;
            row_to_plan(stored)
        })
        .await
    }

    async fn active_plans(&self) -> PlanningRepositoryResult<Vec<Plan>> {
        self.run_blocking(move |connection| {
            let rows = plans::table
                .filter(plans::status.eq(PlanStatus::Active.as_str()))
                .order(plans::plan_id.asc())
                .select(PlanRow::as_select())
                .load::<PlanRow>(connection)
                .map_err(PlanningRepositoryError::persistence)?;
            rows.into_iter().map(row_to_plan).collect()
        })
        .await
    }

    async fn plan_detail(&self, plan_id: PlanId) -> PlanningRepositoryResult<Option<PlanDetail>> {
        let id = plan_id.into_inner();
        self.run_blocking(move |connection| {
            let Some(plan_row) = plans::table
                .find(id)
                .select(PlanRow::as_select())
                .first::<PlanRow>(connection)
                .optional()
                .map_err(PlanningRepositoryError::persistence)?
            else {
                return Ok(None);
            };
            let todo_rows = todos::table
                .filter(todos::plan_id.eq(id))
                .order(todos::todo_id.asc())
                .select(TodoRow::as_select())
                .load::<TodoRow>(connection)
                .map_err(PlanningRepositoryError::persistence)?;
            let uncertainty_rows = uncertainties::table
                .filter(uncertainties::plan_id.eq(id))
                .order(uncertainties::uncertainty_id.asc())
                .select(UncertaintyRow::as_select())
                .load::<UncertaintyRow>(connection)
                .map_err(PlanningRepositoryError::persistence)?;

            Ok(Some(PlanDetail {
                plan: row_to_plan(plan_row)?,
                todos: todo_rows
                    .into_iter()
                    .map(row_to_todo)
                    .collect::<PlanningRepositoryResult<_>>()?,
                uncertainties: uncertainty_rows
                    .into_iter()
                    .map(row_to_uncertainty)
                    .collect::<PlanningRepositoryResult<_>>()?,
            }))
        })
        .await
    }

    async fn revise_plan(&self, revision: PlanRevision) -> PlanningRepositoryResult<Option<Plan>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(plans::table.find(revision.plan_id.into_inner()))
                .set((
                    plans::description.eq(&revision.description),
                    plans::updated_at.eq(revision.requested_at),
                ))
                .returning(PlanRow::as_returning())
                .get_result::<PlanRow>(connection)
                .optional()
                .map_err(PlanningRepositoryError::persistence)?;
            row.map(row_to_plan).transpose()
        })
        .await
    }

    async fn find_uncertainty(
        &self,
        uncertainty_id: UncertaintyId,
    ) -> PlanningRepositoryResult<Option<Uncertainty>> {
        self.run_blocking(move |connection| {
            let row = uncertainties::table
                .find(uncertainty_id.into_inner())
                .select(UncertaintyRow::as_select())
                .first::<UncertaintyRow>(connection)
                .optional()
                .map_err(PlanningRepositoryError::persistence)?;
            row.map(row_to_uncertainty).transpose()
        })
        .await
    }

    async fn assess_uncertainty(
        &self,
        assessment: UncertaintyAssessment,
    ) -> PlanningRepositoryResult<Option<Uncertainty>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                uncertainties::table.find(assessment.uncertainty_id.into_inner()),
            )
            .set((
                uncertainties::confidence.eq(confidence_to_column(assessment.confidence)),
                uncertainties::actions_result.eq(Some(assessment.actions_result)),
                uncertainties::updated_at.eq(assessment.requested_at),
            ))
            .returning(UncertaintyRow::as_returning())
            .get_result::<UncertaintyRow>(connection)
            .optional()
            .map_err(PlanningRepositoryError::persistence)?;
            row.map(row_to_uncertainty).transpose()
        })
        .await
    }

    async fn add_todo(&self, todo: NewTodo) -> PlanningRepositoryResult<Todo> {
        let plan_id = todo.plan_id;
        let new_row = NewTodoRow {
            plan_id: plan_id.into_inner(),
            description: todo.description,
            priority: todo.priority.as_str().to_owned(),
            status: todo.status.as_str().to_owned(),
            created_at: todo.requested_at,
            updated_at: todo.requested_at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(todos::table)
                .values(&new_row)
                .returning(TodoRow::as_returning())
                .get_result::<TodoRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        PlanningRepositoryError::PlanNotFound(plan_id)
                    }
                    _ => PlanningRepositoryError::persistence(err),
                })?;
            row_to_todo(row)
        })
        .await
    }

    async fn find_todo(&self, todo_id: TodoId) -> PlanningRepositoryResult<Option<Todo>> {
        self.run_blocking(move |connection| {
            let row = todos::table
                .find(todo_id.into_inner())
                .select(TodoRow::as_select())
                .first::<TodoRow>(connection)
                .optional()
                .map_err(PlanningRepositoryError::persistence)?;
            row.map(row_to_todo).transpose()
        })
        .await
    }

    async fn report_todo(&self, report: TodoReport) -> PlanningRepositoryResult<Option<Todo>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(todos::table.find(report.todo_id.into_inner()))
                .set((
                    todos::status.eq(report.status.as_str()),
                    todos::report.eq(Some(report.report)),
                    todos::updated_at.eq(report.requested_at),
                ))
                .returning(TodoRow::as_returning())
                .get_result::<TodoRow>(connection)
                .optional()
                .map_err(PlanningRepositoryError::persistence)?;
            row.map(row_to_todo).transpose()
        })
        .await
    }
}

fn confidence_to_column(confidence: Confidence) -> i16 {
    i16::from(confidence.value())
}

fn confidence_from_column(raw: i16) -> PlanningRepositoryResult<Confidence> {
    Confidence::new(i64::from(raw)).map_err(PlanningRepositoryError::invalid_persisted_data)
}

fn row_to_plan(row: PlanRow) -> PlanningRepositoryResult<Plan> {
    let PlanRow {
        plan_id,
        name,
        description,
        status,
        confident,
        created_at,
        updated_at,
    } = row;

    Ok(Plan {
        id: PlanId::new(plan_id).map_err(PlanningRepositoryError::invalid_persisted_data)?,
        name,
        description,
        status: PlanStatus::try_from(status.as_str())
            .map_err(PlanningRepositoryError::invalid_persisted_data)?,
        confident: confidence_from_column(confident)?,
        created_at,
        updated_at,
    })
}

fn row_to_uncertainty(row: UncertaintyRow) -> PlanningRepositoryResult<Uncertainty> {
    let UncertaintyRow {
        uncertainty_id,
        plan_id,
        description,
        confidence,
        actions_to_resolve,
        actions_result,
        created_at,
        updated_at,
    } = row;

    Ok(Uncertainty {
        id: UncertaintyId::new(uncertainty_id)
            .map_err(PlanningRepositoryError::invalid_persisted_data)?,
        plan_id: PlanId::new(plan_id).map_err(PlanningRepositoryError::invalid_persisted_data)?,
        description,
        confidence: confidence_from_column(confidence)?,
        actions_to_resolve,
        actions_result,
        created_at,
        updated_at,
    })
}

fn row_to_todo(row: TodoRow) -> PlanningRepositoryResult<Todo> {
    let TodoRow {
        todo_id,
        plan_id,
        description,
        priority,
        status,
        report,
        created_at,
        updated_at,
    } = row;

    Ok(Todo {
        id: TodoId::new(todo_id).map_err(PlanningRepositoryError::invalid_persisted_data)?,
        plan_id: PlanId::new(plan_id).map_err(PlanningRepositoryError::invalid_persisted_data)?,
        description,
        priority: TodoPriority::try_from(priority.as_str())
            .map_err(PlanningRepositoryError::invalid_persisted_data)?,
        status: TodoStatus::try_from(status.as_str())
            .map_err(PlanningRepositoryError::invalid_persisted_data)?,
        report,
        created_at,
        updated_at,
    })
}
