//! `PostgreSQL` adapter for planning persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresPlanningRepository;
