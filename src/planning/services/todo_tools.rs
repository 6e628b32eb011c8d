//! Tools that add, hand out, and report todos.

use super::{plan_tools::PLAN_NOT_FOUND, prompts};
use crate::planning::{
    domain::{NewTodo, PlanId, TodoId, TodoPriority, TodoReport, TodoStatus},
    ports::{PlanningRepository, PlanningRepositoryError},
};
use crate::tool::domain::{
    CallContext, FieldSchema, InputSchema, ToolError, ToolOutput, ToolRegistrationError, ToolSpec,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

const TODO_NOT_FOUND: &str = "Todo not found";

fn priority_field() -> FieldSchema {
    FieldSchema::enumeration(TodoPriority::ALL.map(TodoPriority::as_str))
        .describe("The priority of the todo")
}

fn status_field() -> FieldSchema {
    FieldSchema::enumeration(TodoStatus::ALL.map(TodoStatus::as_str))
        .describe("The status of the todo")
}

fn todo_id_field() -> FieldSchema {
    FieldSchema::integer().describe("The id of the todo")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTodoInput {
    plan_id: i64,
    description: String,
    priority: TodoPriority,
    status: TodoStatus,
}

/// `add_todo_to_plan`: appends a step to an existing plan.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn add_todo_to_plan<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "add_todo_to_plan",
        "Add a todo to a plan, the todo is a step to do the plan",
        InputSchema::new()
            .field("planId", FieldSchema::integer().describe("The id of the plan"))
            .field(
                "description",
                FieldSchema::string().describe("The detailed description of the todo"),
            )
            .field("priority", priority_field())
            .field("status", status_field()),
        move |input: AddTodoInput, context: CallContext| {
            handle_add_todo(Arc::clone(&repository), input, context.timestamp())
        },
    )
}

async fn handle_add_todo<R>(
    repository: Arc<R>,
    input: AddTodoInput,
    requested_at: DateTime<Utc>,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(plan_id) = PlanId::new(input.plan_id) else {
        return Ok(PLAN_NOT_FOUND.into());
    };
    let added = repository
        .add_todo(NewTodo {
            plan_id,
            description: input.description,
            priority: input.priority,
            status: input.status,
            requested_at,
        })
        .await;
    match added {
        Ok(todo) => Ok(format!("Todo added successfully: {}", todo.id).into()),
        Err(PlanningRepositoryError::PlanNotFound(_)) => Ok(PLAN_NOT_FOUND.into()),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoTodoInput {
    todo_id: i64,
}

/// `do_todo`: hands a todo's description back to the agent.
///
/// The `status` argument is accepted and defaulted but does not change the
/// stored todo; `report_todo` records progress.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn do_todo<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "do_todo",
        "Do a todo",
        InputSchema::new()
            .field("todoId", todo_id_field())
            .field("status", status_field().with_default(TodoStatus::Todo.as_str())),
        move |input: DoTodoInput, _context: CallContext| {
            handle_do_todo(Arc::clone(&repository), input)
        },
    )
}

async fn handle_do_todo<R>(repository: Arc<R>, input: DoTodoInput) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(todo_id) = TodoId::new(input.todo_id) else {
        return Ok(TODO_NOT_FOUND.into());
    };
    match repository.find_todo(todo_id).await? {
        Some(todo) => Ok(prompts::todo_instruction(&todo.description)?.into()),
        None => Ok(TODO_NOT_FOUND.into()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportTodoInput {
    todo_id: i64,
    status: TodoStatus,
    report: String,
}

/// `report_todo`: records a todo's outcome.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn report_todo<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "report_todo",
        "Report a todo with status and report",
        InputSchema::new()
            .field("todoId", todo_id_field())
            .field("status", status_field().with_default(TodoStatus::Done.as_str()))
            .field("report", FieldSchema::string().describe("The report of the todo")),
        move |input: ReportTodoInput, context: CallContext| {
            handle_report_todo(Arc::clone(&repository), input, context.timestamp())
        },
    )
}

async fn handle_report_todo<R>(
    repository: Arc<R>,
    input: ReportTodoInput,
    requested_at: DateTime<Utc>,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(todo_id) = TodoId::new(input.todo_id) else {
        return Ok(TODO_NOT_FOUND.into());
    };
    let reported = repository
        .report_todo(TodoReport {
            todo_id,
            status: input.status,
            report: input.report,
            requested_at,
        })
        .await?;
    Ok(reported.map_or_else(
        || TODO_NOT_FOUND.into(),
        |todo| format!("Todo reported successfully: {}", todo.id).into(),
    ))
}
