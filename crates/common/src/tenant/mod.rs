//! 租户隔离模块
//!
//! 所有租户作用域内的读写都必须经过这里，系统中其余代码不负责租户过滤。
//!
//! 按照概念独立性原则组织，每个概念都有独立的文件：
//! - `id.rs` - 租户标识校验、生成与 slug 规范化
//! - `isolation.rs` - 记录包装、过滤与跨租户断言
//! - `query.rs` - 租户查询与响应信封
//! - `accessor.rs` - 绑定单一租户的数据访问器
//! - `error.rs` - 隔离违规错误

// 子模块
pub mod accessor;
pub mod error;
pub mod id;
pub mod isolation;
pub mod query;

// 公共API导出
pub use accessor::{TenantDataAccessor, create_tenant_data_accessor};
pub use error::IsolationViolation;
pub use id::{MAX_SLUG_LEN, generate_tenant_id, is_valid_tenant_id, sanitize_tenant_slug};
pub use isolation::{
    TenantOwned, TenantScoped, assert_same_tenant, filter_by_tenant, scope_to_tenant,
    validate_tenant_access,
};
pub use query::{TenantApiResponse, TenantQuery, create_tenant_query, wrap_tenant_response};
