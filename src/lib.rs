//! # warden
//!
//! 多租户隔离核心：租户隔离访问器、角色权限、防篡改审计日志与敏感字段保护

pub mod config;
pub mod error;
pub mod observability;
pub mod session;

// Re-export commonly used types
pub use config::WardenConfig;
pub use error::{Error, Result, WardenError, WardenResult};
pub use session::{TenantSession, Warden};
pub use warden_audit::{AuditEntry, AuditEvent, AuditLog, AuditQuery};
pub use warden_common::{Permission, Role, TenantId};
