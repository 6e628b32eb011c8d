//! Guidance texts returned by the workflow tools.

use minijinja::{Environment, context};

const WORKFLOW_TEMPLATE: &str = "\
to accomplish the user question: {{ question }}, you should do the following steps:
1. Analyze the user question
2. Create a plan using the tool: create_plan, make sure to include all the uncertainties in the plan
3. Do research on the uncertainty using the tool: do_research_on_uncertainty
4. Update the confidence of the uncertainty using the tool: update_uncertainty_confidence
5. Improve the plan using the tool: improve_plan
6. Add todo to the plan using the tool: add_todo_to_plan
7. Do the todo using the tool: do_todo
8. report the todo using the tool: report_todo";

const RESEARCH_TEMPLATE: &str = "\
Do research about the uncertainty: {{ description }}
Please do deep research on the uncertainty and update the uncertainty confidence, \
use the tool: {{ tools | join(\", \") }}";

const TODO_TEMPLATE: &str = "Please do the todo: {{ description }} sequentially";

/// Renders the step-by-step workflow for answering `question`.
///
/// # Errors
///
/// Returns [`minijinja::Error`] when rendering fails.
pub fn workflow_guidance(question: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(WORKFLOW_TEMPLATE, context! { question })
}

/// Renders research instructions for an uncertainty.
///
/// # Errors
///
/// Returns [`minijinja::Error`] when rendering fails.
pub fn research_instructions(
    description: &str,
    tools: &[&str],
) -> Result<String, minijinja::Error> {
    Environment::new().render_str(RESEARCH_TEMPLATE, context! { description, tools })
}

/// Renders the instruction to carry out a todo.
///
/// # Errors
///
/// Returns [`minijinja::Error`] when rendering fails.
pub fn todo_instruction(description: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(TODO_TEMPLATE, context! { description })
}
