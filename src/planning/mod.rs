//! Hierarchical planning records and the tools that operate on them.
//!
//! A plan carries uncertainties to research and todos to carry out. The
//! module follows the hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Tool declarations in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
