//! In-process audit table for local development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::audit_log::AuditLogEntry;
use crate::storage::AuditStore;

/// Audit table kept in memory, keyed by (partition key, row key).
#[derive(Default)]
pub struct MemoryAuditStore {
    table: RwLock<BTreeMap<(String, String), AuditLogEntry>>,
    created: AtomicBool,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        let mut entries: Vec<_> = self.table.read().await.values().cloned().collect();
        entries.sort_by_key(|e| e.recorded_at);
        entries
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    pub fn table_created(&self) -> bool {
        self.created.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn ensure_table(&self) -> Result<()> {
        self.created.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn upsert(&self, entry: &AuditLogEntry) -> Result<()> {
        if !self.table_created() {
            self.ensure_table().await?;
        }
        self.table.write().await.insert(
            (entry.partition_key.clone(), entry.row_key.clone()),
            entry.clone(),
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit_log::AuditAction;
    use crate::models::employee::Employee;

    fn employee() -> Employee {
        Employee {
            id: 3,
            name: "Bruno".to_string(),
            address: "Av. Central 100".to_string(),
            job_title: "Contador".to_string(),
            department: "Financeiro".to_string(),
            salary: 5200.0,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_table_and_stores_entry() {
        let store = MemoryAuditStore::new();
        assert!(!store.table_created());

        let entry = AuditLogEntry::new(&employee(), AuditAction::Created);
        store.upsert(&entry).await.unwrap();

        assert!(store.table_created());
        assert_eq!(store.entries().await, vec![entry]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_keys() {
        let store = MemoryAuditStore::new();
        let mut entry = AuditLogEntry::new(&employee(), AuditAction::Created);
        store.upsert(&entry).await.unwrap();

        entry.name = "Bruno Lima".to_string();
        store.upsert(&entry).await.unwrap();

        let entries = store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Bruno Lima");
    }

    #[tokio::test]
    async fn test_distinct_row_keys_append() {
        let store = MemoryAuditStore::new();
        store
            .upsert(&AuditLogEntry::new(&employee(), AuditAction::Created))
            .await
            .unwrap();
        store
            .upsert(&AuditLogEntry::new(&employee(), AuditAction::Deleted))
            .await
            .unwrap();
        assert_eq!(store.len().await, 2);
    }
}
