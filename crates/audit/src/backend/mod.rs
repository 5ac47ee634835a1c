//! 审计存储后端抽象接口
//!
//! 定义了所有存储后端必须实现的统一同步接口

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use warden_common::TenantId;

use crate::entry::{AuditEntry, AuditEvent};
use crate::error::AuditResult;

/// 审计存储后端抽象接口
///
/// 每个租户是一个独立分区。实现必须在分区锁内完成封存与追加，
/// 保证同一分区内的序号单调、哈希链连续；不同分区之间不需要互斥。
pub trait AuditBackend: Send + Sync {
    /// 封存事件并追加到所属租户分区
    ///
    /// # Returns
    /// 已写入的记录
    fn append(&self, event: AuditEvent) -> AuditResult<AuditEntry>;

    /// 按插入顺序返回某个租户分区的全部记录
    ///
    /// 分区不存在时返回空列表
    fn entries(&self, tenant_id: &TenantId) -> AuditResult<Vec<AuditEntry>>;

    /// 删除某个租户分区
    fn clear_tenant(&self, tenant_id: &TenantId) -> AuditResult<()>;

    /// 删除全部分区
    fn clear_all(&self) -> AuditResult<()>;

    /// 列出已有记录的租户
    fn tenants(&self) -> AuditResult<Vec<TenantId>>;
}
