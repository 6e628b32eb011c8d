//! Ad-hoc statement execution against the configured database.
//!
//! Only exposed when a database is configured.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
