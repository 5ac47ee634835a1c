//! 顶层错误枚举
//!
//! 聚合所有子模块的错误类型，提供统一的错误处理接口

use super::{ConfigError, SerializationError, ValidationError};
use thiserror::Error;

/// 顶层错误枚举，聚合基础库内的错误
#[derive(Error, Debug)]
pub enum BaseError {
    // ========== 基础设施错误 ==========
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // ========== 通用错误 ==========
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<toml::de::Error> for BaseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(SerializationError::Toml(err))
    }
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, BaseError>;
