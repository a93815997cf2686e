//! Domain models.

pub mod audit_log;
pub mod employee;
