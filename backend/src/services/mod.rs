//! Business logic services.

pub mod audit_service;
pub mod employee_service;
