//! MCP planner: a Model Context Protocol tool server for hierarchical
//! planning records and ad-hoc SQL.
//!
//! Every tool is declared with an input schema and runs inside a uniform
//! envelope that validates arguments, catches faults, and always yields a
//! well-formed tool result.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Tool declarations and the invocation envelope
//!
//! # Modules
//!
//! - [`tool`]: Schema validation, the invocation envelope, and the registry
//! - [`planning`]: Plans, uncertainties, todos, and their tools
//! - [`sql`]: Connection checks and ad-hoc statements
//! - [`server`]: JSON-RPC routing and the stdio transport
//! - [`config`] and [`app`]: Startup configuration and wiring

pub mod app;
pub mod config;
pub mod database;
pub mod planning;
pub mod server;
pub mod sql;
pub mod tool;
