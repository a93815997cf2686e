//! Audit table backends.

pub mod azure;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AuditBackend, Config};
use crate::error::{AppError, Result};
use crate::models::audit_log::AuditLogEntry;

/// Key-value table holding append-only audit entries.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Create the backing table if it does not exist yet
    async fn ensure_table(&self) -> Result<()>;

    /// Insert or replace the entity at (partition key, row key)
    async fn upsert(&self, entry: &AuditLogEntry) -> Result<()>;

    /// Check that the backing table is reachable
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Build the configured audit store and make sure its table exists.
pub async fn create_audit_store(config: &Config) -> Result<Arc<dyn AuditStore>> {
    let store: Arc<dyn AuditStore> = match config.audit_backend {
        AuditBackend::AzureTable => {
            let connection_string = config.audit_connection_string.as_deref().ok_or_else(|| {
                AppError::Config("AUDIT_STORAGE_CONNECTION_STRING not set".to_string())
            })?;
            let table_config = azure::AzureTableConfig::from_connection_string(
                connection_string,
                &config.audit_table_name,
            )?;
            Arc::new(azure::AzureTableStore::new(table_config)?)
        }
        AuditBackend::Memory => Arc::new(memory::MemoryAuditStore::new()),
    };

    store.ensure_table().await?;
    tracing::info!(
        backend = store.backend_name(),
        table = %config.audit_table_name,
        "Audit table ready"
    );

    Ok(store)
}
