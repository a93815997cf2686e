//! Audit logging service.
//!
//! Mirrors every employee mutation into the audit table, applying the
//! configured failure policy.

use std::sync::Arc;

use crate::config::AuditFailurePolicy;
use crate::error::{AppError, Result};
use crate::models::audit_log::{AuditAction, AuditLogEntry};
use crate::models::employee::Employee;
use crate::storage::AuditStore;

/// Audit service
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    policy: AuditFailurePolicy,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>, policy: AuditFailurePolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    /// Record `action` on `employee`.
    ///
    /// Returns the written entry, or `None` when the upsert failed under the
    /// best-effort policy.
    pub async fn record(
        &self,
        employee: &Employee,
        action: AuditAction,
        correlation_id: Option<&str>,
    ) -> Result<Option<AuditLogEntry>> {
        let mut entry = AuditLogEntry::new(employee, action);
        if let Some(id) = correlation_id {
            entry = entry.correlation(id);
        }

        match self.store.upsert(&entry).await {
            Ok(()) => {
                tracing::debug!(
                    action = action.as_str(),
                    employee_id = employee.id,
                    partition_key = %entry.partition_key,
                    row_key = %entry.row_key,
                    "Audit entry written"
                );
                Ok(Some(entry))
            }
            Err(e) => match self.policy {
                AuditFailurePolicy::BestEffort => {
                    tracing::warn!(
                        error = %e,
                        action = action.as_str(),
                        employee_id = employee.id,
                        partition_key = %entry.partition_key,
                        row_key = %entry.row_key,
                        "Audit entry dropped"
                    );
                    Ok(None)
                }
                AuditFailurePolicy::Strict => Err(AppError::AuditWrite(format!(
                    "{} audit entry for employee {} was not written: {}",
                    action.as_str(),
                    employee.id,
                    e
                ))),
            },
        }
    }
}
