//! 审计日志句柄

use std::sync::Arc;

use tracing::info;
use warden_common::TenantId;

use crate::backend::AuditBackend;
use crate::config::AuditConfig;
use crate::entry::{AuditEntry, AuditEvent, verify_chain};
use crate::error::AuditResult;
use crate::query::AuditQuery;
use crate::storage::AuditStorage;

/// 审计日志
///
/// 克隆只复制句柄，所有克隆共享同一个存储。
#[derive(Debug, Clone)]
pub struct AuditLog {
    storage: Arc<AuditStorage>,
}

impl AuditLog {
    pub fn new(storage: AuditStorage) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// 内存审计日志
    pub fn in_memory() -> Self {
        Self::new(AuditStorage::memory())
    }

    pub fn from_config(config: &AuditConfig) -> AuditResult<Self> {
        AuditStorage::from_config(config).map(Self::new)
    }

    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }

    /// 记录一条审计事件，时间戳由存储分配
    pub fn create_audit_entry(&self, event: AuditEvent) -> AuditResult<AuditEntry> {
        self.storage.append(event)
    }

    /// 查询某个租户的审计记录
    pub fn get_audit_log(
        &self,
        tenant_id: &TenantId,
        query: &AuditQuery,
    ) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.storage.entries(tenant_id)?;
        Ok(query.apply(entries))
    }

    /// 清空一个租户分区；`None` 时清空全部
    pub fn clear_audit_log(&self, tenant_id: Option<&TenantId>) -> AuditResult<()> {
        match tenant_id {
            Some(tenant_id) => {
                self.storage.clear_tenant(tenant_id)?;
                info!(tenant_id = %tenant_id, "Audit log cleared for tenant");
            }
            None => {
                self.storage.clear_all()?;
                info!("Audit log cleared for all tenants");
            }
        }
        Ok(())
    }

    /// 校验租户分区的哈希链
    pub fn verify_chain(&self, tenant_id: &TenantId) -> AuditResult<()> {
        let entries = self.storage.entries(tenant_id)?;
        verify_chain(tenant_id, &entries)
    }

    pub fn count(&self, tenant_id: &TenantId) -> AuditResult<usize> {
        Ok(self.storage.entries(tenant_id)?.len())
    }

    pub fn tenants(&self) -> AuditResult<Vec<TenantId>> {
        self.storage.tenants()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::in_memory()
    }
}
