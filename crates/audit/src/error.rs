//! 审计日志错误定义

use thiserror::Error;
use warden_common::TenantId;

/// 审计日志错误类型
#[derive(Error, Debug)]
pub enum AuditError {
    /// 文件读写错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 租户标识不能用作分区名
    #[error("Invalid tenant id for audit partition: '{0}'")]
    InvalidTenant(String),

    /// 哈希链断裂
    #[error("Audit chain of tenant '{tenant}' is broken at sequence {sequence}")]
    IntegrityViolation { tenant: TenantId, sequence: u64 },

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 审计日志结果类型
pub type AuditResult<T> = Result<T, AuditError>;
