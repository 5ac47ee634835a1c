//! 共享配置段
//!
//! 各 crate 共用的配置结构。主配置 `WardenConfig` 位于 `warden` crate，
//! 这里只放与具体组件无关的部分。

use serde::{Deserialize, Serialize};

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,warden_audit=debug"）。默认值 "info"。
    /// 设置了 RUST_LOG 时以 RUST_LOG 为准。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 日志输出目标
    ///
    /// - "console": 仅输出到控制台（默认）
    /// - "file": 输出到文件
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志轮转开关
    ///
    /// 当 output = "file" 时有效：
    /// - true: 按天轮转日志文件
    /// - false: 追加到单个文件
    #[serde(default)]
    pub rotate: bool,

    /// 日志文件目录
    ///
    /// 当 output = "file" 时有效
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl ObservabilityConfig {
    /// 获取过滤级别，优先使用 RUST_LOG
    pub fn effective_filter(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.filter_level.clone())
    }

    /// 是否输出到文件
    pub fn is_file_logging(&self) -> bool {
        self.log.output == "file"
    }

    /// 验证配置，返回发现的所有问题
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let main_level = self.filter_level.split(',').next().unwrap_or("").trim();
        if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
            errors.push(format!(
                "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                self.filter_level
            ));
        }

        if !["console", "file"].contains(&self.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.log.output
            ));
        }

        if self.is_file_logging() && self.log.path.trim().is_empty() {
            errors.push("observability.log.path cannot be empty when output = 'file'".to_string());
        }

        errors
    }
}
