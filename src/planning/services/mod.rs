//! The planning tools and the guidance texts they return.

mod plan_tools;
mod prompts;
mod todo_tools;
mod uncertainty_tools;


pub use plan_tools::{ask_wulang, create_plan, get_all_plans, get_detailed_plan, improve_plan};
pub use todo_tools::{add_todo_to_plan, do_todo, report_todo};
pub use uncertainty_tools::{
    ResearchTool, do_research_on_uncertainty, update_uncertainty_confidence,
};

use crate::planning::ports::PlanningRepository;
use crate::tool::domain::{ToolRegistrationError, ToolSpec};
use std::sync::Arc;

/// Builds every planning tool over a shared repository, in workflow order.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if any declaration is invalid.
pub fn planning_tools<R>(repository: &Arc<R>) -> Result<Vec<ToolSpec>, ToolRegistrationError>
where
    R: PlanningRepository + ?Sized + 'static,
{
    Ok(vec![
        ask_wulang()?,
        create_plan(Arc::clone(repository))?,
        get_all_plans(Arc::clone(repository))?,
        get_detailed_plan(Arc::clone(repository))?,
        update_uncertainty_confidence(Arc::clone(repository))?,
        do_research_on_uncertainty(Arc::clone(repository))?,
        improve_plan(Arc::clone(repository))?,
        add_todo_to_plan(Arc::clone(repository))?,
        do_todo(Arc::clone(repository))?,
        report_todo(Arc::clone(repository))?,
    ])
}
