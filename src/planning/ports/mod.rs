//! Port contracts for planning persistence.

mod repository;

#[cfg(test)]
pub use repository::MockPlanningRepository;
pub use repository::{PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult};
