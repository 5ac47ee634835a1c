//! 敏感字段加密模块
//!
//! 使用 AES-256-GCM 对租户字段做认证加密
//! 密文格式: `enc:v1:` + base64(nonce[12] || ciphertext || tag[16])

// Allow deprecated generic-array::from_slice until aes-gcm upgrades
#![allow(deprecated)]

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng},
};
use base64::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VaultError, VaultResult};
use crate::key::TenantKey;

/// 密文标签前缀
pub const ENCRYPTED_PREFIX: &str = "enc:";

/// 当前密文格式版本
pub const CURRENT_VERSION: &str = "v1";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// 值是否带有密文标签
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// 带标签的密文 `enc:<version>:<payload>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedValue(String);

impl EncryptedValue {
    /// 解析带标签的密文，标签结构不完整时返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix(ENCRYPTED_PREFIX)?;
        let (version, payload) = rest.split_once(':')?;
        if version.is_empty() || payload.is_empty() {
            return None;
        }
        Some(Self(value.to_string()))
    }

    fn from_parts(version: &str, payload: &str) -> Self {
        Self(format!("{ENCRYPTED_PREFIX}{version}:{payload}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// 格式版本
    pub fn version(&self) -> &str {
        self.parts().0
    }

    /// 编码后的密文载荷
    pub fn payload(&self) -> &str {
        self.parts().1
    }

    fn parts(&self) -> (&str, &str) {
        self.0
            .strip_prefix(ENCRYPTED_PREFIX)
            .and_then(|rest| rest.split_once(':'))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for EncryptedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncryptedValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 字段加密器
///
/// 绑定一个已派生的字段密钥，避免每次调用都重新派生
#[derive(Clone)]
pub struct FieldProtector {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for FieldProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldProtector")
            .field("version", &CURRENT_VERSION)
            .finish_non_exhaustive()
    }
}

impl FieldProtector {
    pub fn new(key: &TenantKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// 从任意密钥材料创建加密器
    pub fn from_material(material: &str) -> VaultResult<Self> {
        TenantKey::derive(material).map(|key| Self::new(&key))
    }

    /// 加密明文
    ///
    /// 每次调用使用新的随机 nonce，同一明文两次加密的结果也不相同
    pub fn encrypt(&self, plaintext: &str) -> VaultResult<EncryptedValue> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::Crypto(format!("Encryption failed: {e}")))?;

        // 组合: nonce || ciphertext (包含 tag)
        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(EncryptedValue::from_parts(
            CURRENT_VERSION,
            &BASE64_STANDARD.encode(&sealed),
        ))
    }

    /// 解密
    ///
    /// - 没有密文标签：视为加密启用前写入的明文，原样返回
    /// - 有标签：成功时返回明文；密钥不匹配、版本未知或载荷损坏时返回 `None`
    pub fn decrypt(&self, value: &str) -> Option<String> {
        if !is_encrypted(value) {
            return Some(value.to_string());
        }

        let Some(encrypted) = EncryptedValue::parse(value) else {
            debug!("Malformed encrypted value tag");
            return None;
        };
        if encrypted.version() != CURRENT_VERSION {
            debug!(
                "Unsupported encrypted value version: {}",
                encrypted.version()
            );
            return None;
        }

        let sealed = BASE64_STANDARD.decode(encrypted.payload()).ok()?;
        if sealed.len() < NONCE_LEN + TAG_LEN {
            debug!("Encrypted payload too short: {} bytes", sealed.len());
            return None;
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .ok()?;

        String::from_utf8(plaintext).ok()
    }
}

/// 使用密钥材料加密租户数据
pub fn encrypt_tenant_data(plaintext: &str, key: &str) -> VaultResult<EncryptedValue> {
    FieldProtector::from_material(key)?.encrypt(plaintext)
}

/// 使用密钥材料解密租户数据，语义见 [`FieldProtector::decrypt`]
pub fn decrypt_tenant_data(value: &str, key: &str) -> Option<String> {
    if !is_encrypted(value) {
        return Some(value.to_string());
    }
    FieldProtector::from_material(key).ok()?.decrypt(value)
}
