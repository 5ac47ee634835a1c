//! Warden 基础设施库
//!
//! 为租户隔离核心提供基础组件，包括租户标识校验与生成、租户隔离访问器、
//! 角色权限表、统一错误类型以及可观测性配置

pub mod config;
pub mod error;
pub mod rbac;
pub mod tenant;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{LogConfig, ObservabilityConfig};
pub use error::{BaseError, ConfigError, Result, SerializationError, ValidationError};
pub use rbac::{Permission, Role, RolePermissions};
pub use tenant::{
    IsolationViolation, TenantApiResponse, TenantDataAccessor, TenantOwned, TenantQuery,
    TenantScoped, assert_same_tenant, create_tenant_data_accessor, create_tenant_query,
    filter_by_tenant, generate_tenant_id, is_valid_tenant_id, sanitize_tenant_slug,
    scope_to_tenant, validate_tenant_access, wrap_tenant_response,
};
pub use types::TenantId;
