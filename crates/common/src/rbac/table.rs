//! 角色权限表
//!
//! 编译期常量，进程内不可变。表的形状本身是约定：
//! - 基数严格递减：`|owner| > |admin| > |analyst| > |viewer| > |guest|`
//! - 每个角色的集合包含其下一级角色的集合
//! - `owner` 包含全部管理权限与案件生命周期权限
//! - `guest` 只读：包含 `case:read`，不含 `case:create`、`case:delete` 及任何 `admin:*`

use crate::error::ValidationError;

use super::permission::Permission;
use super::role::Role;

use Permission::*;

const OWNER: &[Permission] = &[
    CaseRead,
    CaseCreate,
    CaseUpdate,
    CaseDelete,
    CaseExport,
    CaseShare,
    EvidenceRead,
    EvidenceUpload,
    ReportRead,
    ReportExport,
    AiUse,
    AiConfigure,
    AuditRead,
    UserInvite,
    UserManage,
    AdminSettings,
    AdminBilling,
    AdminApi,
    AdminTenant,
];

const ADMIN: &[Permission] = &[
    CaseRead,
    CaseCreate,
    CaseUpdate,
    CaseDelete,
    CaseExport,
    CaseShare,
    EvidenceRead,
    EvidenceUpload,
    ReportRead,
    ReportExport,
    AiUse,
    AiConfigure,
    AuditRead,
    UserInvite,
    UserManage,
    AdminSettings,
];

const ANALYST: &[Permission] = &[
    CaseRead,
    CaseCreate,
    CaseUpdate,
    CaseExport,
    EvidenceRead,
    EvidenceUpload,
    ReportRead,
    ReportExport,
    AiUse,
];

const VIEWER: &[Permission] = &[CaseRead, EvidenceRead, ReportRead];

const GUEST: &[Permission] = &[CaseRead];

/// `owner` 必须拥有的权限
const OWNER_REQUIRED: &[Permission] = &[AdminBilling, AdminApi, CaseCreate, CaseDelete];

/// `guest` 绝不能拥有的非 admin 权限
const GUEST_FORBIDDEN: &[Permission] = &[CaseCreate, CaseDelete];

/// 角色权限表
pub struct RolePermissions;

impl RolePermissions {
    /// 查询角色的权限集合（有序）
    pub fn permissions_for(role: Role) -> &'static [Permission] {
        match role {
            Role::Owner => OWNER,
            Role::Admin => ADMIN,
            Role::Analyst => ANALYST,
            Role::Viewer => VIEWER,
            Role::Guest => GUEST,
        }
    }

    /// 按层级从高到低遍历整张表
    pub fn entries() -> impl Iterator<Item = (Role, &'static [Permission])> {
        Role::hierarchy()
            .into_iter()
            .map(|role| (role, Self::permissions_for(role)))
    }

    /// 检查权限表是否满足层级约定
    pub fn verify_hierarchy() -> Result<(), ValidationError> {
        let violation = |reason: String| Err(ValidationError::RoleHierarchy { reason });

        for (role, permissions) in Self::entries() {
            for (i, permission) in permissions.iter().enumerate() {
                if permissions[..i].contains(permission) {
                    return violation(format!("{role} lists {permission} twice"));
                }
            }
        }

        let hierarchy = Role::hierarchy();
        for pair in hierarchy.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            let (upper_set, lower_set) = (upper.permissions(), lower.permissions());
            if upper_set.len() <= lower_set.len() {
                return violation(format!(
                    "{upper} has {} permissions, not more than {lower} ({})",
                    upper_set.len(),
                    lower_set.len()
                ));
            }
            if let Some(missing) = lower_set.iter().find(|p| !upper_set.contains(*p)) {
                return violation(format!("{lower} has {missing} but {upper} does not"));
            }
        }

        if let Some(missing) = OWNER_REQUIRED.iter().find(|p| !Role::Owner.allows(**p)) {
            return violation(format!("owner is missing {missing}"));
        }

        if !Role::Guest.allows(CaseRead) {
            return violation("guest is missing case:read".to_string());
        }
        if let Some(extra) = GUEST
            .iter()
            .find(|p| p.is_admin() || GUEST_FORBIDDEN.contains(*p))
        {
            return violation(format!("guest must not have {extra}"));
        }

        Ok(())
    }
}
