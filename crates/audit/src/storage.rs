//! 审计存储统一接口

use std::fmt;
use std::sync::Arc;

use warden_common::TenantId;

use crate::backend::{AuditBackend, FileBackend, MemoryBackend};
use crate::config::{AuditBackendKind, AuditConfig};
use crate::entry::{AuditEntry, AuditEvent};
use crate::error::AuditResult;

/// 审计存储
///
/// 内置后端直接分发，`Custom` 接受调用方注入的任意实现。
pub enum AuditStorage {
    /// 内存后端
    Memory(MemoryBackend),

    /// 文件后端
    File(Box<FileBackend>),

    /// 调用方提供的后端
    Custom(Arc<dyn AuditBackend>),
}

impl fmt::Debug for AuditStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(b) => f.debug_tuple("Memory").field(b).finish(),
            Self::File(b) => f.debug_tuple("File").field(&b.dir()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl AuditStorage {
    /// 从配置创建存储实例
    ///
    /// # Errors
    /// - 文件后端的目录无法创建
    pub fn from_config(config: &AuditConfig) -> AuditResult<Self> {
        match config.backend {
            AuditBackendKind::Memory => Ok(Self::Memory(MemoryBackend::new())),
            AuditBackendKind::File => {
                let backend = FileBackend::open(&config.path)?;
                Ok(Self::File(Box::new(backend)))
            }
        }
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryBackend::new())
    }

    pub fn custom(backend: Arc<dyn AuditBackend>) -> Self {
        Self::Custom(backend)
    }

    fn backend(&self) -> &dyn AuditBackend {
        match self {
            Self::Memory(b) => b,
            Self::File(b) => b.as_ref(),
            Self::Custom(b) => b.as_ref(),
        }
    }
}

impl AuditBackend for AuditStorage {
    fn append(&self, event: AuditEvent) -> AuditResult<AuditEntry> {
        self.backend().append(event)
    }

    fn entries(&self, tenant_id: &TenantId) -> AuditResult<Vec<AuditEntry>> {
        self.backend().entries(tenant_id)
    }

    fn clear_tenant(&self, tenant_id: &TenantId) -> AuditResult<()> {
        self.backend().clear_tenant(tenant_id)
    }

    fn clear_all(&self) -> AuditResult<()> {
        self.backend().clear_all()
    }

    fn tenants(&self) -> AuditResult<Vec<TenantId>> {
        self.backend().tenants()
    }
}
