//! Employee model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::audit_log::MAX_PARTITION_KEY_CHARS;

/// Employee row as stored in the `employees` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Store-assigned identifier
    pub id: i32,
    pub name: String,
    pub address: String,
    pub job_title: String,
    /// Department, e.g. "TI", "RH", "Financeiro"
    pub department: String,
    pub salary: f64,
}

/// Create / update payload. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub salary: f64,
}

impl EmployeeRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if self.department.trim().chars().count() > MAX_PARTITION_KEY_CHARS {
            return Err(AppError::Validation(format!(
                "department must be at most {} characters",
                MAX_PARTITION_KEY_CHARS
            )));
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(AppError::Validation(
                "salary must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// A field that Update is allowed to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpdatableField {
    Name,
    Address,
    JobTitle,
    Department,
    Salary,
}

impl UpdatableField {
    pub const ALL: [UpdatableField; 5] = [
        UpdatableField::Name,
        UpdatableField::Address,
        UpdatableField::JobTitle,
        UpdatableField::Department,
        UpdatableField::Salary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatableField::Name => "name",
            UpdatableField::Address => "address",
            UpdatableField::JobTitle => "jobTitle",
            UpdatableField::Department => "department",
            UpdatableField::Salary => "salary",
        }
    }
}

impl fmt::Display for UpdatableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdatableField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(UpdatableField::Name),
            "address" => Ok(UpdatableField::Address),
            "jobtitle" | "job_title" => Ok(UpdatableField::JobTitle),
            "department" => Ok(UpdatableField::Department),
            "salary" => Ok(UpdatableField::Salary),
            other => Err(AppError::Config(format!(
                "Unknown updatable employee field: {}",
                other
            ))),
        }
    }
}

/// The set of fields Update carries over from the request.
///
/// Defaults to name and address only; job title, department and salary
/// submitted on update are ignored unless configured here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatableFields(Vec<UpdatableField>);

impl UpdatableFields {
    pub fn new(fields: impl IntoIterator<Item = UpdatableField>) -> Self {
        let mut fields: Vec<_> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        Self(fields)
    }

    pub fn all() -> Self {
        Self::new(UpdatableField::ALL)
    }

    /// Parse a comma-separated list such as `name,address,jobTitle`.
    pub fn parse(list: &str) -> Result<Self> {
        let fields = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(UpdatableField::from_str)
            .collect::<Result<Vec<_>>>()?;

        if fields.is_empty() {
            return Err(AppError::Config(
                "EMPLOYEE_UPDATABLE_FIELDS must name at least one field".to_string(),
            ));
        }
        Ok(Self::new(fields))
    }

    pub fn contains(&self, field: UpdatableField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = UpdatableField> + '_ {
        self.0.iter().copied()
    }

    /// Overwrite the configured fields of `employee` with the request values.
    pub fn apply(&self, employee: &mut Employee, request: &EmployeeRequest) {
        for field in self.iter() {
            match field {
                UpdatableField::Name => employee.name = request.name.clone(),
                UpdatableField::Address => employee.address = request.address.clone(),
                UpdatableField::JobTitle => employee.job_title = request.job_title.clone(),
                UpdatableField::Department => employee.department = request.department.clone(),
                UpdatableField::Salary => employee.salary = request.salary,
            }
        }
    }
}

impl Default for UpdatableFields {
    fn default() -> Self {
        Self::new([UpdatableField::Name, UpdatableField::Address])
    }
}

impl fmt::Display for UpdatableFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|field| field.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            id: 1,
            name: "Ana".to_string(),
            address: "Rua A".to_string(),
            job_title: "Analista".to_string(),
            department: "RH".to_string(),
            salary: 3000.0,
        }
    }

    fn request() -> EmployeeRequest {
        EmployeeRequest {
            name: "Ana Souza".to_string(),
            address: "Rua B".to_string(),
            job_title: "Gerente".to_string(),
            department: "TI".to_string(),
            salary: 9000.0,
        }
    }

    #[test]
    fn test_default_updates_name_and_address_only() {
        let mut e = employee();
        UpdatableFields::default().apply(&mut e, &request());

        assert_eq!(e.name, "Ana Souza");
        assert_eq!(e.address, "Rua B");
        assert_eq!(e.job_title, "Analista");
        assert_eq!(e.department, "RH");
        assert_eq!(e.salary, 3000.0);
        assert_eq!(e.id, 1);
    }

    #[test]
    fn test_all_fields_updates_everything_but_id() {
        let mut e = employee();
        UpdatableFields::all().apply(&mut e, &request());

        assert_eq!(e.job_title, "Gerente");
        assert_eq!(e.department, "TI");
        assert_eq!(e.salary, 9000.0);
        assert_eq!(e.id, 1);
    }

    #[test]
    fn test_parse_field_list() {
        let fields = UpdatableFields::parse("Name, job_title ,salary,name").unwrap();
        assert!(fields.contains(UpdatableField::Name));
        assert!(fields.contains(UpdatableField::JobTitle));
        assert!(fields.contains(UpdatableField::Salary));
        assert!(!fields.contains(UpdatableField::Address));
        assert_eq!(fields.to_string(), "name,jobTitle,salary");
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty() {
        assert!(matches!(
            UpdatableFields::parse("name,badge"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(UpdatableFields::parse(" , "), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut r = request();
        r.name = "   ".to_string();
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_negative_salary() {
        let mut r = request();
        r.salary = -1.0;
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
        r.salary = f64::NAN;
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_caps_department_length() {
        let mut r = request();
        r.department = "D".repeat(MAX_PARTITION_KEY_CHARS);
        assert!(r.validate().is_ok());
        r.department.push('D');
        assert!(matches!(
            r.validate(),
            Err(AppError::Validation(msg)) if msg.contains("department")
        ));
    }

    #[test]
    fn test_missing_name_deserializes_empty_and_fails_validation() {
        let r: EmployeeRequest = serde_json::from_str(r#"{"address": "Rua A"}"#).unwrap();
        assert_eq!(r.name, "");
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_request_json_uses_camel_case_and_ignores_id() {
        let r: EmployeeRequest = serde_json::from_str(
            r#"{"id": 99, "name": "Ana", "address": "Rua A", "department": "RH", "jobTitle": "Analista", "salary": 3000}"#,
        )
        .unwrap();
        assert_eq!(r.job_title, "Analista");
        assert_eq!(r.salary, 3000.0);
    }

    #[test]
    fn test_employee_serializes_camel_case() {
        let json = serde_json::to_value(employee()).unwrap();
        assert_eq!(json["jobTitle"], "Analista");
        assert_eq!(json["id"], 1);
    }
}
