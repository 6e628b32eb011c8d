//! Adapter implementations for the statement executor port.

pub mod memory;
pub mod postgres;
