//! Vault 配置
//!
//! 主密钥用于按租户派生字段密钥。未配置主密钥时字段保护不可用。

use serde::{Deserialize, Serialize};

use crate::error::VaultResult;
use crate::key::{KeySource, MasterKey};

/// Vault 配置
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct VaultConfig {
    /// 主密钥 - 直接配置
    ///
    /// 支持两种格式：
    /// - 64 字符的十六进制字符串（32 字节）
    /// - 44 字符的 Base64 字符串（32 字节）
    ///
    /// 注意：直接在配置文件中存储主密钥不够安全，生产环境建议使用 key_env 或 key_file
    #[serde(default)]
    pub key: Option<String>,

    /// 主密钥环境变量名称
    ///
    /// 例如：key_env = "WARDEN_MASTER_KEY"
    #[serde(default)]
    pub key_env: Option<String>,

    /// 主密钥文件路径
    ///
    /// 文件权限应设置为 600 (仅所有者可读写)
    #[serde(default)]
    pub key_file: Option<String>,
}

impl VaultConfig {
    /// 获取主密钥来源
    ///
    /// 优先级: key_file > key_env > key
    pub fn get_key_source(&self) -> Option<KeySource> {
        if let Some(path) = &self.key_file {
            return Some(KeySource::File(path.clone()));
        }

        if let Some(env_var) = &self.key_env {
            return Some(KeySource::Environment(env_var.clone()));
        }

        if let Some(key) = &self.key {
            return Some(KeySource::Direct(key.clone()));
        }

        None
    }

    /// 加载主密钥，未配置时返回 `Ok(None)`
    pub fn load_master_key(&self) -> VaultResult<Option<MasterKey>> {
        self.get_key_source()
            .map(|source| MasterKey::from_key_source(&source))
            .transpose()
    }

    /// 是否在配置文件中直接写入了主密钥
    pub fn has_inline_key(&self) -> bool {
        self.key.is_some()
    }
}
