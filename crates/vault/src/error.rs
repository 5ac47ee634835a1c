//! Vault 错误定义

use thiserror::Error;

/// Vault 错误类型
#[derive(Error, Debug)]
pub enum VaultError {
    /// 配置错误（密钥来源、密钥格式）
    #[error("Configuration error: {0}")]
    Config(String),

    /// 加密/解密错误
    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Vault 结果类型别名
pub type VaultResult<T> = Result<T, VaultError>;
