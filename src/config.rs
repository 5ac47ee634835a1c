//! Warden 主配置
//!
//! 汇总各组件的配置段，从 TOML 文件加载。

use std::path::Path;

use serde::{Deserialize, Serialize};
use warden_audit::AuditConfig;
use warden_common::{BaseError, ConfigError, ObservabilityConfig};
use warden_vault::{KeySource, MasterKey, VaultConfig};

/// Warden 主配置
///
/// # 配置示例
///
/// ```toml
/// name = "warden-01"
/// env = "prod"
///
/// [observability]
/// filter_level = "info,warden_audit=debug"
///
/// [observability.log]
/// output = "file"
/// rotate = true
/// path = "/var/log/warden/"
///
/// [audit]
/// backend = "file"
/// path = "/var/lib/warden/audit"
///
/// [vault]
/// key_file = "/etc/warden/master.key"
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WardenConfig {
    /// 实例名称
    #[serde(default = "default_name")]
    pub name: String,

    /// 运行环境：dev、prod 或 test
    #[serde(default = "default_env")]
    pub env: String,

    /// 可观测性配置（日志）
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// 审计存储配置
    #[serde(default)]
    pub audit: AuditConfig,

    /// 字段保护主密钥配置
    #[serde(default)]
    pub vault: VaultConfig,
}

fn default_name() -> String {
    "warden".to_string()
}

fn default_env() -> String {
    "dev".to_string()
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            env: default_env(),
            observability: ObservabilityConfig::default(),
            audit: AuditConfig::default(),
            vault: VaultConfig::default(),
        }
    }
}

impl WardenConfig {
    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> warden_common::Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml(&content)
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml(content: &str) -> warden_common::Result<Self> {
        toml::from_str(content).map_err(BaseError::from)
    }

    pub fn is_production(&self) -> bool {
        self.env == "prod"
    }

    /// 验证配置
    ///
    /// 返回发现的全部问题，以 `Warning:` 开头的条目不阻止启动。
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        errors.extend(self.observability.validate());
        errors.extend(self.audit.validate());

        match self.vault.get_key_source() {
            None => errors.push(
                "Warning: no vault master key configured (vault.key / vault.key_env / vault.key_file), field protection is disabled".to_string(),
            ),
            Some(KeySource::Direct(key)) => {
                if let Err(e) = MasterKey::parse(&key) {
                    errors.push(format!("Invalid vault.key: {e}"));
                }
                if self.is_production() {
                    errors.push(
                        "Warning: vault.key is stored inline in a production config, prefer vault.key_env or vault.key_file".to_string(),
                    );
                }
            }
            Some(KeySource::File(path)) => {
                if !Path::new(&path).is_file() {
                    errors.push(format!("vault.key_file does not exist: {path}"));
                }
            }
            Some(KeySource::Environment(_)) => {}
        }

        if self.is_production() && self.audit.backend == warden_audit::AuditBackendKind::Memory {
            errors.push(
                "Warning: audit.backend = \"memory\" in production, audit entries are lost on restart".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use warden_audit::AuditBackendKind;

    fn with_key(env: &str) -> WardenConfig {
        WardenConfig {
            env: env.to_string(),
            vault: VaultConfig {
                key: Some(MasterKey::generate()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = WardenConfig::from_toml("").unwrap();
        assert_eq!(config, WardenConfig::default());
        assert_eq!(config.audit.backend, AuditBackendKind::Memory);
    }

    #[test]
    fn test_full_config_parses() {
        let config = WardenConfig::from_toml(
            r#"
            name = "warden-01"
            env = "prod"

            [observability]
            filter_level = "debug"

            [observability.log]
            output = "file"
            rotate = true
            path = "/var/log/warden/"

            [audit]
            backend = "file"
            path = "/var/lib/warden/audit"

            [vault]
            key_env = "WARDEN_MASTER_KEY"
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "warden-01");
        assert!(config.is_production());
        assert!(config.observability.is_file_logging());
        assert_eq!(config.audit.backend, AuditBackendKind::File);
        assert_eq!(config.vault.key_env.as_deref(), Some("WARDEN_MASTER_KEY"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(WardenConfig::from_toml("name = ").is_err());
        assert!(WardenConfig::from_toml("[audit]\nbackend = \"s3\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = WardenConfig::from_file("/nonexistent/warden.toml");
        assert!(matches!(
            result,
            Err(BaseError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "name = \"from-file\"\n").unwrap();
        assert_eq!(WardenConfig::from_file(&path).unwrap().name, "from-file");
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let config = WardenConfig {
            name: " ".to_string(),
            env: "staging".to_string(),
            ..with_key("dev")
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| !e.starts_with("Warning:")));
    }

    #[test]
    fn test_missing_key_is_only_a_warning() {
        let errors = WardenConfig::default().validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Warning:"));
    }

    #[test]
    fn test_inline_key_in_prod_warns() {
        let mut config = with_key("prod");
        config.audit.backend = AuditBackendKind::File;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Warning:"));
        assert!(with_key("dev").validate().is_ok());
    }

    #[test]
    fn test_malformed_inline_key_is_an_error() {
        let config = WardenConfig {
            vault: VaultConfig {
                key: Some("not-a-key".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("Invalid vault.key")));
    }
}
