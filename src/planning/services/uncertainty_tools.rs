//! Tools that drive research on a plan's uncertainties.

use super::{plan_tools::confidence_field, prompts};
use crate::planning::{
    domain::{Confidence, UncertaintyAssessment, UncertaintyId},
    ports::PlanningRepository,
};
use crate::tool::domain::{
    CallContext, FieldSchema, InputSchema, ToolError, ToolOutput, ToolRegistrationError, ToolSpec,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

const UNCERTAINTY_NOT_FOUND: &str = "Uncertainty not found";

/// Research avenues an agent may be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ResearchTool {
    /// Search file contents.
    #[serde(rename = "grep_search")]
    GrepSearch,
    /// List directory contents.
    #[serde(rename = "list_dir")]
    ListDir,
    /// Search file names.
    #[serde(rename = "file_search")]
    FileSearch,
    /// Search the web.
    #[serde(rename = "web_search in reddit, stackoverflow, official document, etc.")]
    WebSearch,
}

impl ResearchTool {
    /// Every research tool in declaration order.
    pub const ALL: [Self; 4] = [Self::GrepSearch, Self::ListDir, Self::FileSearch, Self::WebSearch];

    /// Returns the name shown to agents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GrepSearch => "grep_search",
            Self::ListDir => "list_dir",
            Self::FileSearch => "file_search",
            Self::WebSearch => "web_search in reddit, stackoverflow, official document, etc.",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentInput {
    uncertainty_id: i64,
    confidence: Confidence,
    actions_result: String,
}

/// `update_uncertainty_confidence`: records research findings.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn update_uncertainty_confidence<R>(
    repository: Arc<R>,
) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "update_uncertainty_confidence",
        "Update the confidence of a uncertainty after the research is done",
        InputSchema::new()
            .field(
                "uncertaintyId",
                FieldSchema::integer().describe("The id of the uncertainty"),
            )
            .field(
                "confidence",
                confidence_field("The confidence of the uncertainty 0-100"),
            )
            .field(
                "actionsResult",
                FieldSchema::string().describe("The actions result"),
            ),
        move |input: AssessmentInput, context: CallContext| {
            handle_update_confidence(Arc::clone(&repository), input, context.timestamp())
        },
    )
}

async fn handle_update_confidence<R>(
    repository: Arc<R>,
    input: AssessmentInput,
    requested_at: DateTime<Utc>,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(uncertainty_id) = UncertaintyId::new(input.uncertainty_id) else {
        return Ok(UNCERTAINTY_NOT_FOUND.into());
    };
    let updated = repository
        .assess_uncertainty(UncertaintyAssessment {
            uncertainty_id,
            confidence: input.confidence,
            actions_result: input.actions_result,
            requested_at,
        })
        .await?;
    Ok(updated.map_or_else(
        || UNCERTAINTY_NOT_FOUND.into(),
        |uncertainty| {
            format!(
                "Uncertainty updated successfully: {}, the next step is to iterate until all uncertainties are resolved",
                uncertainty.id
            )
            .into()
        },
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchInput {
    uncertainty_id: i64,
    research_tool: Vec<ResearchTool>,
}

/// `do_research_on_uncertainty`: tells the agent how to investigate.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if the declaration is invalid.
pub fn do_research_on_uncertainty<R>(
    repository: Arc<R>,
) -> Result<ToolSpec, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    ToolSpec::from_fn(
        "do_research_on_uncertainty",
        "Do research on a uncertainty to update the confidence, you can use the tool like graph to do research on the uncertainty",
        InputSchema::new()
            .field(
                "uncertaintyId",
                FieldSchema::integer().describe("The id of the uncertainty"),
            )
            .field(
                "researchTool",
                FieldSchema::array(FieldSchema::enumeration(
                    ResearchTool::ALL.map(ResearchTool::as_str),
                ))
                .describe("The tool to do research on the uncertainty"),
            ),
        move |input: ResearchInput, _context: CallContext| {
            handle_research(Arc::clone(&repository), input)
        },
    )
}

async fn handle_research<R>(
    repository: Arc<R>,
    input: ResearchInput,
) -> Result<ToolOutput, ToolError>
where
    R: PlanningRepository + ?Sized,
{
    let Ok(uncertainty_id) = UncertaintyId::new(input.uncertainty_id) else {
        return Ok(UNCERTAINTY_NOT_FOUND.into());
    };
    let Some(uncertainty) = repository.find_uncertainty(uncertainty_id).await? else {
        return Ok(UNCERTAINTY_NOT_FOUND.into());
    };
    let tools: Vec<&str> = input
        .research_tool
        .iter()
        .copied()
        .map(ResearchTool::as_str)
        .collect();
    Ok(prompts::research_instructions(&uncertainty.description, &tools)?.into())
}
