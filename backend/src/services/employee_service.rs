//! Employee service: primary-store CRUD with audit mirroring.
//!
//! Every mutation hits the relational store first; the audit entry is
//! written only after the primary write succeeded. The two writes are not
//! atomic with each other.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::audit_log::AuditAction;
use crate::models::employee::{Employee, EmployeeRequest, UpdatableFields};
use crate::repository::EmployeeRepository;
use crate::services::audit_service::AuditService;

#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
    audit: AuditService,
    updatable_fields: UpdatableFields,
}

impl EmployeeService {
    pub fn new(
        repository: Arc<dyn EmployeeRepository>,
        audit: AuditService,
        updatable_fields: UpdatableFields,
    ) -> Self {
        Self {
            repository,
            audit,
            updatable_fields,
        }
    }

    pub fn repository(&self) -> &Arc<dyn EmployeeRepository> {
        &self.repository
    }

    pub fn audit(&self) -> &AuditService {
        &self.audit
    }

    pub async fn get(&self, id: i32) -> Result<Employee> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(
        &self,
        request: EmployeeRequest,
        correlation_id: Option<&str>,
    ) -> Result<Employee> {
        request.validate()?;

        let employee = self.repository.insert(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to save employee");
            AppError::Persistence("Failed to save the employee to the database".to_string())
        })?;
        tracing::info!(
            employee_id = employee.id,
            department = %employee.department,
            "Employee created"
        );

        self.audit
            .record(&employee, AuditAction::Created, correlation_id)
            .await?;

        Ok(employee)
    }

    /// Overwrite the configured updatable fields of employee `id`.
    pub async fn update(
        &self,
        id: i32,
        request: EmployeeRequest,
        correlation_id: Option<&str>,
    ) -> Result<Employee> {
        request.validate()?;

        let mut employee = self.get(id).await?;
        self.updatable_fields.apply(&mut employee, &request);

        let employee = self
            .repository
            .update(&employee)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(employee_id = id, fields = %self.updatable_fields, "Employee updated");

        self.audit
            .record(&employee, AuditAction::Updated, correlation_id)
            .await?;

        Ok(employee)
    }

    /// Delete employee `id`, returning its pre-deletion snapshot.
    pub async fn delete(&self, id: i32, correlation_id: Option<&str>) -> Result<Employee> {
        let employee = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(employee_id = id, "Employee deleted");

        self.audit
            .record(&employee, AuditAction::Deleted, correlation_id)
            .await?;

        Ok(employee)
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Employee {} not found", id))
}
