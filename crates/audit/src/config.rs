//! 审计存储配置

use serde::{Deserialize, Serialize};

/// 审计后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditBackendKind {
    /// 进程内存，重启即丢失
    #[default]
    Memory,
    /// 每租户一个 JSON Lines 文件
    File,
}

/// 审计配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditConfig {
    /// 存储后端类型
    #[serde(default)]
    pub backend: AuditBackendKind,

    /// 审计文件目录（当 backend = "file" 时使用）
    #[serde(default = "default_audit_path")]
    pub path: String,
}

fn default_audit_path() -> String {
    "audit/".to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: AuditBackendKind::default(),
            path: default_audit_path(),
        }
    }
}

impl AuditConfig {
    /// 验证配置，返回发现的问题
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.backend == AuditBackendKind::File && self.path.trim().is_empty() {
            errors.push("audit.path must not be empty when audit.backend = \"file\"".to_string());
        }
        errors
    }
}
