//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use crate::models::employee::UpdatableFields;
use std::env;

/// Where audit entries are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditBackend {
    /// Azure Table Storage (or Azurite)
    AzureTable,
    /// In-process table, for local development
    Memory,
}

impl AuditBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "azure_table" | "azure" => Ok(AuditBackend::AzureTable),
            "memory" => Ok(AuditBackend::Memory),
            other => Err(AppError::Config(format!("Unknown AUDIT_BACKEND: {}", other))),
        }
    }
}

/// What to do when the audit upsert fails after the primary write succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFailurePolicy {
    /// Log the failure and return the primary operation's response
    #[default]
    BestEffort,
    /// Surface the failure to the caller; the primary write is kept
    Strict,
}

impl AuditFailurePolicy {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(AuditFailurePolicy::BestEffort),
            "strict" => Ok(AuditFailurePolicy::Strict),
            other => Err(AppError::Config(format!(
                "Unknown AUDIT_FAILURE_POLICY: {}",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Server bind address (host:port)
    pub bind_address: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Audit store backend
    pub audit_backend: AuditBackend,

    /// Table storage connection string (azure_table backend)
    pub audit_connection_string: Option<String>,

    /// Audit table name
    pub audit_table_name: String,

    pub audit_failure_policy: AuditFailurePolicy,

    /// Fields Update is allowed to overwrite
    pub updatable_fields: UpdatableFields,

    /// OTLP collector endpoint (optional)
    pub otel_endpoint: Option<String>,

    pub otel_service_name: String,
}

redacted_debug!(Config {
    redact database_url,
    show database_max_connections,
    show bind_address,
    show request_timeout_secs,
    show audit_backend,
    redact_option audit_connection_string,
    show audit_table_name,
    show audit_failure_policy,
    show updatable_fields,
    show otel_endpoint,
    show otel_service_name,
});

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let audit_backend = AuditBackend::parse(&var("AUDIT_BACKEND", "azure_table"))?;
        let audit_connection_string = lookup("AUDIT_STORAGE_CONNECTION_STRING");
        if audit_backend == AuditBackend::AzureTable && audit_connection_string.is_none() {
            return Err(AppError::Config(
                "AUDIT_STORAGE_CONNECTION_STRING not set".into(),
            ));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| AppError::Config("DATABASE_URL not set".into()))?,
            database_max_connections: var("DATABASE_MAX_CONNECTIONS", "20")
                .parse()
                .unwrap_or(20),
            bind_address: var("BIND_ADDRESS", "0.0.0.0:8080"),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            audit_backend,
            audit_connection_string,
            audit_table_name: var("AUDIT_TABLE_NAME", "EmployeeAuditLog"),
            audit_failure_policy: AuditFailurePolicy::parse(&var(
                "AUDIT_FAILURE_POLICY",
                "best_effort",
            ))?,
            updatable_fields: UpdatableFields::parse(&var(
                "EMPLOYEE_UPDATABLE_FIELDS",
                "name,address",
            ))?,
            otel_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT"),
            otel_service_name: var("OTEL_SERVICE_NAME", "employee-registry"),
        })
    }
}
