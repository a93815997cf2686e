//! Common test utilities for handler and service tests
//!
//! - In-memory `EmployeeRepository` standing in for Postgres
//! - Audit stores that always fail, for failure-policy tests
//! - Router construction and request helpers driven by `tower::ServiceExt`

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use employee_registry_backend::{
    api::{routes::create_router, AppState},
    config::Config,
    error::{AppError, Result},
    models::audit_log::AuditLogEntry,
    models::employee::{Employee, EmployeeRequest},
    repository::EmployeeRepository,
    storage::{memory::MemoryAuditStore, AuditStore},
};

/// Employees kept in a map, ids assigned from a sequence like SERIAL.
#[derive(Default)]
pub struct MemoryEmployeeRepository {
    rows: Mutex<BTreeMap<i32, Employee>>,
    next_id: AtomicI32,
    reject_writes: AtomicBool,
}

impl MemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert fail like a constraint violation
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn find(&self, id: i32) -> Result<Option<Employee>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, request: &EmployeeRequest) -> Result<Employee> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "new row violates check constraint".to_string(),
            ));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let employee = Employee {
            id,
            name: request.name.clone(),
            address: request.address.clone(),
            job_title: request.job_title.clone(),
            department: request.department.clone(),
            salary: request.salary,
        };
        self.rows.lock().await.insert(id, employee.clone());
        Ok(employee)
    }

    async fn update(&self, employee: &Employee) -> Result<Option<Employee>> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&employee.id) {
            Some(row) => {
                *row = employee.clone();
                Ok(Some(employee.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<Employee>> {
        Ok(self.rows.lock().await.remove(&id))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Audit store whose upserts always fail
pub struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn ensure_table(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, _entry: &AuditLogEntry) -> Result<()> {
        Err(AppError::Storage("Azure upsert failed: connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        Err(AppError::Storage("Azure table unreachable".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Build a config for tests from extra variables on top of a memory backend
pub fn test_config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("DATABASE_URL".into(), "postgres://test@localhost/test".into());
    vars.insert("AUDIT_BACKEND".into(), "memory".into());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Test application with handles on both stores
pub struct TestApp {
    pub router: Router,
    pub employees: Arc<MemoryEmployeeRepository>,
    pub audit: Arc<MemoryAuditStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config(&[]))
    }

    pub fn with_config(config: Config) -> Self {
        let employees = Arc::new(MemoryEmployeeRepository::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let state = Arc::new(AppState::new(config, employees.clone(), audit.clone()));
        Self {
            router: create_router(state),
            employees,
            audit,
        }
    }

    /// Send a request and return status, headers and parsed JSON body (if any)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Option<Value>) {
        send(&self.router, method, uri, body).await
    }
}

/// Router backed by the in-memory repository and an arbitrary audit store
pub fn router_with_audit_store(
    config: Config,
    audit: Arc<dyn AuditStore>,
) -> (Router, Arc<MemoryEmployeeRepository>) {
    let employees = Arc::new(MemoryEmployeeRepository::new());
    let state = Arc::new(AppState::new(config, employees.clone(), audit));
    (create_router(state), employees)
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Option<Value>) {
    send_with_headers(router, method, uri, &[], body).await
}

pub async fn send_with_headers(
    router: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Option<Value>) {
    let raw = body.map(|json| json.to_string());
    send_raw(router, method, uri, headers, raw).await
}

/// Send an arbitrary (possibly malformed) JSON body
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<String>,
) -> (StatusCode, axum::http::HeaderMap, Option<Value>) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(raw) => builder
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).expect("response body should be JSON"))
    };
    (status, headers, json)
}
