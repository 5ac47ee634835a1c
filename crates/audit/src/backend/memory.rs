//! 内存审计后端
//!
//! 分区表用 `RwLock` 保护，每个分区有自己的 `Mutex`，
//! 追加只锁住目标分区。记录随进程退出而丢失。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;
use warden_common::TenantId;

use super::AuditBackend;
use crate::entry::{AuditEntry, AuditEvent};
use crate::error::AuditResult;

type Partition = Arc<Mutex<Vec<AuditEntry>>>;

/// 内存审计后端
#[derive(Debug, Default)]
pub struct MemoryBackend {
    partitions: RwLock<HashMap<TenantId, Partition>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, tenant_id: &TenantId) -> Partition {
        if let Some(partition) = self.partitions.read().get(tenant_id) {
            return Arc::clone(partition);
        }

        let mut partitions = self.partitions.write();
        Arc::clone(partitions.entry(tenant_id.clone()).or_default())
    }
}

impl AuditBackend for MemoryBackend {
    fn append(&self, event: AuditEvent) -> AuditResult<AuditEntry> {
        let partition = self.partition(event.tenant_id());
        let mut entries = partition.lock();

        let entry = AuditEntry::seal(event, entries.last());
        entries.push(entry.clone());

        debug!(
            tenant_id = %entry.tenant_id,
            sequence = entry.sequence,
            action = %entry.action,
            "Audit entry appended"
        );
        Ok(entry)
    }

    fn entries(&self, tenant_id: &TenantId) -> AuditResult<Vec<AuditEntry>> {
        let partition = self.partitions.read().get(tenant_id).cloned();
        Ok(partition.map(|p| p.lock().clone()).unwrap_or_default())
    }

    fn clear_tenant(&self, tenant_id: &TenantId) -> AuditResult<()> {
        self.partitions.write().remove(tenant_id);
        Ok(())
    }

    fn clear_all(&self) -> AuditResult<()> {
        self.partitions.write().clear();
        Ok(())
    }

    fn tenants(&self) -> AuditResult<Vec<TenantId>> {
        let mut tenants: Vec<TenantId> = self
            .partitions
            .read()
            .iter()
            .filter(|(_, partition)| !partition.lock().is_empty())
            .map(|(tenant_id, _)| tenant_id.clone())
            .collect();
        tenants.sort();
        Ok(tenants)
    }
}
