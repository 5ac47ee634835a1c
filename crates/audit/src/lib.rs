//! Warden Audit - 租户审计日志
//!
//! 提供以下功能：
//! 1. 按租户分区的只追加审计记录，查询永远不会跨越分区
//! 2. 每个分区是一条 SHA-256 哈希链，可校验篡改
//! 3. 可注入的存储后端：内存、JSON Lines 文件，或调用方自定义实现
//!
//! # 设计
//!
//! - `AuditBackend` trait 定义统一的同步接口
//! - `AuditStorage` enum 封装不同的后端实现
//! - `AuditLog` 是显式构造、可廉价克隆的句柄，没有模块级全局状态

pub mod backend;
pub mod config;
pub mod entry;
pub mod error;
pub mod query;
pub mod storage;
pub mod store;

// Re-export commonly used items
pub use backend::{AuditBackend, FileBackend, MemoryBackend};
pub use config::{AuditBackendKind, AuditConfig};
pub use entry::{AuditEntry, AuditEvent, GENESIS_HASH};
pub use error::{AuditError, AuditResult};
pub use query::AuditQuery;
pub use storage::AuditStorage;
pub use store::AuditLog;
