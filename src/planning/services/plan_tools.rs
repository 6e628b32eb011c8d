//! Tools that create, list, inspect, and revise plans.

use super::prompts;
use crate::planning::{
    domain::{Confidence, NewPlan, NewUncertainty, PlanId, PlanRevision},
    ports::PlanningRepository,
};
use crate::tool::domain::{
    CallContext, FieldSchema, InputSchema, ToolError, ToolOutput, ToolRegistrationError, ToolSpec,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

pub(super) const PLAN_NOT_FOUND: &str = "Plan not found";
const NO_ACTIVE_PLANS: &str = "No active plans";

pub(super) fn confidence_field(description: &str) -> FieldSchema {
    FieldSchema::integer()
        .minimum(0.0)
        .maximum(100.0)
        .describe(description)
}

#[derive(Debug, Deserialize)]
struct AskInput {
    question: String,
}

/// `ask_wulang`: returns the planning workflow for a question.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn ask_wulang() -> Result<ToolSpec, ToolRegistrationError> {
    ToolSpec::from_fn(
        "ask_wulang",
        "Ask Wulang a question about the user question",
        InputSchema::new().field(
            "question",
            FieldSchema::string().describe("The question to ask Wulang"),
        ),
        |input: AskInput, _context: CallContext| async move {
            Ok::<_, ToolError>(prompts::workflow_guidance(&input.question)?)
        },
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlanInput {
    name: String,
    description: String,
    confident: Confidence,
    uncertainties: Vec<UncertaintyInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncertaintyInput {
    description: String,
    uncertainty_confidence: Confidence,
    actions_to_resolve: String,
}

fn create_plan_schema() -> InputSchema {
    let uncertainty = InputSchema::new()
        .field(
            "description",
            FieldSchema::string().describe(
                "The detailed description of the uncertainty, describe the uncertainty in detail",
            ),
        )
        .field(
            "uncertaintyConfidence",
            confidence_field("The confidence of the uncertainty 0-100%"),
        )
        .field(
            "actionsToResolve",
            FieldSchema::string().describe("The actions to take to resolve the uncertainty"),
        );

    InputSchema::new()
        .field("name", FieldSchema::string().describe("The name of the plan"))
        .field(
            "description",
            FieldSchema::string().describe("The detailed description of the plan"),
        )
        .field(
            "confident",
            confidence_field("The confidence of the plan 0-100%"),
        )
        .field(
            "uncertainties",
            FieldSchema::array(FieldSchema::object(uncertainty))
                .describe("The uncertainties of the plan"),
        )
}

/// `create_plan`: stores an `ACTIVE` plan with its uncertainties.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn create_plan<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "create_plan",
        "Create a plan",
        create_plan_schema(),
        move |input: CreatePlanInput, context: CallContext| {
            handle_create_plan(Arc::clone(&repository), input, context.timestamp())
        },
    )
}

async fn handle_create_plan<R>(
    repository: Arc<R>,
    input: CreatePlanInput,
    requested_at: DateTime<Utc>,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let plan = repository
        .create_plan(NewPlan {
            name: input.name,
            description: input.description,
            confident: input.confident,
            uncertainties: input
                .uncertainties
                .into_iter()
                .map(|uncertainty| NewUncertainty {
                    description: uncertainty.description,
                    confidence: uncertainty.uncertainty_confidence,
                    actions_to_resolve: uncertainty.actions_to_resolve,
                })
                .collect(),
            requested_at,
        })
        .await?;
    Ok(format!("Plan created successfully: {}", plan.id).into())
}

/// `get_all_plans`: lists `ACTIVE` plans as pretty JSON.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn get_all_plans<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "get_all_plans",
        "Get all plans to get the plan ID",
        InputSchema::new(),
        move |_input: serde_json::Value, _context: CallContext| {
            handle_get_all_plans(Arc::clone(&repository))
        },
    )
}

async fn handle_get_all_plans<R>(repository: Arc<R>) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let plans = repository.active_plans().await?;
    if plans.is_empty() {
        return Ok(NO_ACTIVE_PLANS.into());
    }
    Ok(serde_json::to_string_pretty(&plans)?.into())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanLookupInput {
    plan_id: i64,
}

/// `get_detailed_plan`: shows a plan with its todos and uncertainties.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn get_detailed_plan<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "get_detailed_plan",
        "Get a plan with detailed information with uncertainty list and todo list",
        InputSchema::new().field(
            "planId",
            FieldSchema::integer().describe("The id of the plan"),
        ),
        move |input: PlanLookupInput, _context: CallContext| {
            handle_get_detailed_plan(Arc::clone(&repository), input)
        },
    )
}

async fn handle_get_detailed_plan<R>(
    repository: Arc<R>,
    input: PlanLookupInput,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(plan_id) = PlanId::new(input.plan_id) else {
        return Ok(PLAN_NOT_FOUND.into());
    };
    match repository.plan_detail(plan_id).await? {
        Some(detail) => Ok(serde_json::to_string_pretty(&detail)?.into()),
        None => Ok(PLAN_NOT_FOUND.into()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImprovePlanInput {
    plan_id: i64,
    description: String,
}

/// `improve_plan`: replaces a plan's description once uncertainties resolve.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn improve_plan<R>(repository: Arc<R>) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "improve_plan",
        "Make sure the plan is improved after the uncertainty is resolved",
        InputSchema::new()
            .field("planId", FieldSchema::integer().describe("The id of the plan"))
            .field(
                "description",
                FieldSchema::string().describe(
                    "The Improved plan description after the uncertainty is resolved",
                ),
            ),
        move |input: ImprovePlanInput, context: CallContext| {
            handle_improve_plan(Arc::clone(&repository), input, context.timestamp())
        },
    )
}

async fn handle_improve_plan<R>(
    repository: Arc<R>,
    input: ImprovePlanInput,
    requested_at: DateTime<Utc>,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(plan_id) = PlanId::new(input.plan_id) else {
        return Ok(PLAN_NOT_FOUND.into());
    };
    let revised = repository
        .revise_plan(PlanRevision {
            plan_id,
            description: input.description,
            requested_at,
        })
        .await?;
    Ok(revised.map_or_else(
        || PLAN_NOT_FOUND.into(),
        |plan| {
            format!(
                "Plan updated successfully: {}, the next step is to add todo to the plan",
                plan.id
            )
            .into()
        },
    ))
}
