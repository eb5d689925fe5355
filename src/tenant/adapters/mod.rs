//! Adapter implementations for the tenant directory port.

pub mod memory;
pub mod postgres;
