//! Audit log model.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::employee::Employee;

/// Kind of mutating action an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "Created",
            AuditAction::Updated => "Updated",
            AuditAction::Deleted => "Deleted",
        }
    }
}

/// Append-only snapshot of an employee at the time of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub partition_key: String,
    pub row_key: String,
    pub action: AuditAction,
    pub employee_id: i32,
    pub name: String,
    pub address: String,
    pub job_title: String,
    pub department: String,
    pub salary: f64,
    pub correlation_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Build an entry for `employee` with a fresh row key.
    pub fn new(employee: &Employee, action: AuditAction) -> Self {
        Self {
            partition_key: partition_key_for(&employee.department),
            row_key: Uuid::new_v4().to_string(),
            action,
            employee_id: employee.id,
            name: employee.name.clone(),
            address: employee.address.clone(),
            job_title: employee.job_title.clone(),
            department: employee.department.clone(),
            salary: employee.salary,
            correlation_id: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Render as a Table service entity (JSON, no OData metadata).
    pub fn to_table_entity(&self) -> serde_json::Value {
        let mut entity = json!({
            "PartitionKey": self.partition_key,
            "RowKey": self.row_key,
            "Action": self.action.as_str(),
            "EmployeeId": self.employee_id,
            "Name": self.name,
            "Address": self.address,
            "JobTitle": self.job_title,
            "Department": self.department,
            "Salary": self.salary,
            "Salary@odata.type": "Edm.Double",
            "RecordedAt": self.recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "RecordedAt@odata.type": "Edm.DateTime",
        });
        if let Some(ref correlation_id) = self.correlation_id {
            entity["CorrelationId"] = json!(correlation_id);
        }
        entity
    }
}

/// Longest department kept in a partition key; the Table service caps keys at 1 KiB.
pub const MAX_PARTITION_KEY_CHARS: usize = 256;

/// Partition keys may not contain `/`, `\`, `#`, `?` or control characters.
pub fn partition_key_for(department: &str) -> String {
    let key: String = department
        .trim()
        .chars()
        .take(MAX_PARTITION_KEY_CHARS)
        .map(|c| match c {
            '/' | '\\' | '#' | '?' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if key.is_empty() {
        "_".to_string()
    } else {
        key
    }
}
