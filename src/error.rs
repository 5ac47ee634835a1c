//! 统一错误处理模型
//!
//! `WardenError` 是租户会话层的错误类型；`Error` 是主程序的顶层错误，
//! 聚合所有子 crate 和依赖的错误。

use thiserror::Error;
use warden_audit::AuditError;
use warden_common::{BaseError, IsolationViolation, Permission, Role, ValidationError};
use warden_vault::VaultError;

/// 租户会话错误
#[derive(Debug, Error)]
pub enum WardenError {
    /// 角色不具备所需权限
    #[error("Permission denied: role '{role}' lacks '{permission}'")]
    PermissionDenied { role: Role, permission: Permission },

    /// 跨租户访问
    #[error(transparent)]
    Isolation(#[from] IsolationViolation),

    /// 输入校验失败
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// 审计存储错误
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// 字段保护错误
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// 未配置主密钥
    #[error("Field protection is unavailable: no vault master key configured")]
    VaultUnavailable,
}

/// 租户会话结果类型
pub type WardenResult<T> = std::result::Result<T, WardenError>;

/// 主程序的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 基础库错误 ==========
    /// Base crate 聚合错误
    #[error("Base library error: {0}")]
    Base(Box<BaseError>),

    /// 会话层错误
    #[error(transparent)]
    Warden(#[from] WardenError),

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // ========== 业务逻辑错误 ==========
    /// 配置验证失败
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // ========== 通用错误 ==========
    /// Anyhow 错误兼容层
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    /// 自定义错误消息
    #[error("Application error: {message}")]
    Custom { message: String },
}

impl From<BaseError> for Error {
    fn from(err: BaseError) -> Self {
        Error::Base(Box::new(err))
    }
}

impl From<AuditError> for Error {
    fn from(err: AuditError) -> Self {
        Error::Warden(err.into())
    }
}

impl From<VaultError> for Error {
    fn from(err: VaultError) -> Self {
        Error::Warden(err.into())
    }
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 创建自定义错误
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// 创建配置验证失败错误
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}
