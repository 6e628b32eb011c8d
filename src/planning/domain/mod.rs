//! Domain model for plans, their uncertainties, and their todos.
//!
//! Records are created and mutated through the repository port; the types
//! here carry no persistence concerns.

mod confidence;
mod error;
mod ids;
mod plan;
mod todo;
mod uncertainty;

pub use confidence::Confidence;
pub use error::PlanningDomainError;
pub use ids::{PlanId, TodoId, UncertaintyId};
pub use plan::{NewPlan, Plan, PlanDetail, PlanRevision, PlanStatus};
pub use todo::{NewTodo, Todo, TodoPriority, TodoReport, TodoStatus};
pub use uncertainty::{NewUncertainty, Uncertainty, UncertaintyAssessment};
