//! 租户隔离错误类型定义

use thiserror::Error;

use crate::types::TenantId;

/// 跨租户访问违规
///
/// 调用方的租户上下文与资源所属租户不一致。这是安全/编程错误，不应被"恢复"，
/// 只能传播到调用方的错误边界。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Cross-tenant access denied: action '{action}' in tenant '{expected}' touched a resource of tenant '{actual}'"
)]
pub struct IsolationViolation {
    /// 调用方所绑定的租户
    pub expected: TenantId,
    /// 资源实际所属的租户
    pub actual: TenantId,
    /// 触发检查的动作名
    pub action: String,
}

impl IsolationViolation {
    pub fn new(expected: &TenantId, actual: &TenantId, action: impl Into<String>) -> Self {
        Self {
            expected: expected.clone(),
            actual: actual.clone(),
            action: action.into(),
        }
    }
}
