//! 角色定义
//!
//! 封闭且有序的角色集合 `owner > admin > analyst > viewer > guest`。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::permission::Permission;
use super::table::RolePermissions;

/// 角色
///
/// 变体按权限从低到高声明，派生的 `Ord` 因此与层级一致。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Guest,
    Viewer,
    Analyst,
    Admin,
    Owner,
}

impl Role {
    /// 从高到低的角色层级
    pub const fn hierarchy() -> [Role; 5] {
        [
            Role::Owner,
            Role::Admin,
            Role::Analyst,
            Role::Viewer,
            Role::Guest,
        ]
    }

    /// 该角色的权限集合
    pub fn permissions(self) -> &'static [Permission] {
        RolePermissions::permissions_for(self)
    }

    /// 该角色是否拥有指定权限
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// 是否严格高于另一角色
    pub fn outranks(self, other: Role) -> bool {
        self > other
    }
}
