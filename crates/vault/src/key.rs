//! 字段保护密钥
//!
//! - `KeySource`：主密钥来源（直接配置、环境变量、文件）
//! - `MasterKey`：32 字节主密钥，用于按租户派生字段密钥
//! - `TenantKey`：AES-256 字段密钥，由 HMAC-SHA256 从密钥材料或主密钥派生

use base64::prelude::*;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use tracing::{debug, info};
use warden_common::TenantId;

use crate::error::{VaultError, VaultResult};

type HmacSha256 = Hmac<Sha256>;

/// 从任意密钥材料派生字段密钥时使用的盐
const FIELD_KEY_SALT: &[u8] = b"warden.vault.field-key.v1";

/// 从主密钥派生租户密钥时使用的域标签
const TENANT_KEY_LABEL: &[u8] = b"warden.vault.tenant-key.v1:";

/// 主密钥来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// 直接从配置文件读取
    Direct(String),
    /// 从环境变量读取
    Environment(String),
    /// 从文件路径读取
    File(String),
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> VaultResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| VaultError::Crypto(format!("Failed to initialise HMAC: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// AES-256 字段密钥
#[derive(Clone, PartialEq, Eq)]
pub struct TenantKey([u8; 32]);

impl std::fmt::Debug for TenantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TenantKey(<redacted>)")
    }
}

impl TenantKey {
    /// 从任意密钥材料派生字段密钥
    ///
    /// 同一材料总是得到同一密钥，不同材料得到不同密钥。
    pub fn derive(material: &str) -> VaultResult<Self> {
        hmac_sha256(FIELD_KEY_SALT, &[material.as_bytes()]).map(Self)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// 32 字节主密钥
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey([u8; 32]);

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

impl MasterKey {
    /// 从密钥来源加载主密钥
    pub fn from_key_source(source: &KeySource) -> VaultResult<Self> {
        let key = match source {
            KeySource::Direct(key) => {
                debug!("Loading master key from direct configuration");
                key.clone()
            }
            KeySource::Environment(env_var) => {
                debug!("Loading master key from environment variable: {}", env_var);
                std::env::var(env_var).map_err(|e| {
                    VaultError::Config(format!(
                        "Failed to read master key from environment variable {env_var}: {e}"
                    ))
                })?
            }
            KeySource::File(path) => {
                debug!("Loading master key from file: {}", path);
                std::fs::read_to_string(path).map_err(|e| {
                    VaultError::Config(format!("Failed to read master key from file {path}: {e}"))
                })?
            }
        };

        let master = Self::parse(&key)?;
        info!("Master key loaded successfully");
        Ok(master)
    }

    /// 解析主密钥
    ///
    /// 接受：
    /// - 64 字符的十六进制字符串 (32 字节)
    /// - 44 字符（或去掉填充后 43 字符）的 Base64 字符串 (32 字节)
    pub fn parse(key: &str) -> VaultResult<Self> {
        let key = key.trim();

        let key_bytes = if key.len() == 64 {
            hex::decode(key)
                .map_err(|e| VaultError::Config(format!("Invalid master key hex format: {e}")))?
        } else if key.len() == 44 {
            BASE64_STANDARD
                .decode(key)
                .map_err(|e| VaultError::Config(format!("Invalid master key base64 format: {e}")))?
        } else if key.len() == 43 {
            BASE64_STANDARD_NO_PAD
                .decode(key)
                .map_err(|e| VaultError::Config(format!("Invalid master key base64 format: {e}")))?
        } else {
            return Err(VaultError::Config(format!(
                "Invalid master key length: expected 64 hex chars or 44 base64 chars, got {}",
                key.len()
            )));
        };

        let bytes: [u8; 32] = key_bytes.try_into().map_err(|bytes: Vec<u8>| {
            VaultError::Config(format!(
                "Invalid master key size: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    /// 为指定租户派生字段密钥
    pub fn tenant_key(&self, tenant_id: &TenantId) -> VaultResult<TenantKey> {
        hmac_sha256(&self.0, &[TENANT_KEY_LABEL, tenant_id.as_str().as_bytes()]).map(TenantKey)
    }

    /// 生成新的主密钥（用于初始化）
    ///
    /// 返回十六进制格式的 32 字节随机密钥
    pub fn generate() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        hex::encode(key)
    }
}
