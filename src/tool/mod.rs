//! Schema-validated tools and the registry that dispatches them.
//!
//! - Domain types in [`domain`]: schemas, tool declarations, results, and
//!   the error taxonomy.
//! - Services in [`services`]: the invocation envelope and the registry.

pub mod domain;
pub mod services;
