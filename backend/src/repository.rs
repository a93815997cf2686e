//! Employee persistence.
//!
//! `EmployeeRepository` is the seam between the service layer and the
//! relational store. Each method is a single statement, so every write is
//! atomic on its own.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::employee::{Employee, EmployeeRequest};

const EMPLOYEE_COLUMNS: &str = "id, name, address, job_title, department, salary";

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Look up an employee by primary key
    async fn find(&self, id: i32) -> Result<Option<Employee>>;

    /// Insert a new employee; the store assigns the id
    async fn insert(&self, request: &EmployeeRequest) -> Result<Employee>;

    /// Overwrite the row with `employee.id`; `None` if it no longer exists
    async fn update(&self, employee: &Employee) -> Result<Option<Employee>>;

    /// Remove the row and return its last state; `None` if absent
    async fn delete(&self, id: i32) -> Result<Option<Employee>>;

    /// Connectivity check
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgEmployeeRepository {
    db: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn find(&self, id: i32) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(employee)
    }

    async fn insert(&self, request: &EmployeeRequest) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (name, address, job_title, department, salary)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.address)
        .bind(&request.job_title)
        .bind(&request.department)
        .bind(request.salary)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    async fn update(&self, employee: &Employee) -> Result<Option<Employee>> {
        let updated = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET name = $2, address = $3, job_title = $4, department = $5, salary = $6
            WHERE id = $1
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.address)
        .bind(&employee.job_title)
        .bind(&employee.department)
        .bind(employee.salary)
        .fetch_optional(&self.db)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<Option<Employee>> {
        let deleted = sqlx::query_as::<_, Employee>(&format!(
            "DELETE FROM employees WHERE id = $1 RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
