//! 验证相关错误类型
//!
//! 定义所有与数据验证、权限检查、规则验证相关的错误

use thiserror::Error;

/// 验证相关错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid format: {field} = {value:?}")]
    InvalidFormat { field: String, value: String },

    #[error("Role hierarchy violated: {reason}")]
    RoleHierarchy { reason: String },
}

impl ValidationError {
    /// 创建格式错误
    pub fn invalid_format(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            value: value.into(),
        }
    }
}
