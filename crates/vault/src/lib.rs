//! Warden Vault - 敏感字段保护
//!
//! 提供以下功能：
//! 1. 按租户派生密钥，对敏感字段做可逆的认证加密（AES-256-GCM）
//! 2. 带版本标签的密文格式 `enc:<version>:<payload>`，调用方无需旁路信息即可判断保护状态
//! 3. 未打标签的历史明文原样透传，密钥不匹配时返回 `None`
//! 4. 展示层使用的单向脱敏

pub mod config;
pub mod crypto;
pub mod error;
pub mod key;
pub mod mask;

// Re-export commonly used items
pub use config::VaultConfig;
pub use crypto::{
    CURRENT_VERSION, ENCRYPTED_PREFIX, EncryptedValue, FieldProtector, decrypt_tenant_data,
    encrypt_tenant_data, is_encrypted,
};
pub use error::{VaultError, VaultResult};
pub use key::{KeySource, MasterKey, TenantKey};
pub use mask::{MASK_CHAR, mask_sensitive_data};
