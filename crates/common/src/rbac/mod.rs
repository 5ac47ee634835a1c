//! 基于角色的访问控制（RBAC）
//!
//! 静态的角色 → 权限表及其查询接口。权限检查本身就是一次成员测试，
//! 由调用上下文完成；这里保证权限表满足层级约定，使这种检查有意义。

pub mod permission;
pub mod role;
pub mod table;

pub use permission::Permission;
pub use role::Role;
pub use table::RolePermissions;
