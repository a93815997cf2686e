//! API module - HTTP handlers and middleware.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use crate::config::Config;
use crate::repository::EmployeeRepository;
use crate::services::audit_service::AuditService;
use crate::services::employee_service::EmployeeService;
use crate::storage::AuditStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: Arc<dyn EmployeeRepository>,
        audit_store: Arc<dyn AuditStore>,
    ) -> Self {
        let audit = AuditService::new(audit_store, config.audit_failure_policy);
        let employees =
            EmployeeService::new(repository, audit, config.updatable_fields.clone());
        Self { config, employees }
    }
}

pub type SharedState = Arc<AppState>;
