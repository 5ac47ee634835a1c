//! 绑定单一租户的数据访问器
//!
//! 完全运行在一个租户上下文中的调用点持有一个访问器即可，
//! 不必在每次调用时传递租户标识。

use super::error::IsolationViolation;
use super::isolation::{
    TenantOwned, TenantScoped, assert_same_tenant, filter_by_tenant, scope_to_tenant,
    validate_tenant_access,
};
use super::query::{TenantApiResponse, TenantQuery, create_tenant_query, wrap_tenant_response};
use crate::types::TenantId;

/// 预绑定租户标识的数据访问器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantDataAccessor {
    tenant_id: TenantId,
}

impl TenantDataAccessor {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// 等价于 `filter_by_tenant(records, tenant_id)`
    pub fn filter<I, R>(&self, records: I) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        R: TenantOwned,
    {
        filter_by_tenant(records, &self.tenant_id)
    }

    /// 等价于 `validate_tenant_access(record, tenant_id)`
    pub fn validate<R: TenantOwned + ?Sized>(&self, record: &R) -> bool {
        validate_tenant_access(record, &self.tenant_id)
    }

    /// 等价于 `scope_to_tenant(record, tenant_id)`
    pub fn scope<T>(&self, record: T) -> TenantScoped<T> {
        scope_to_tenant(record, &self.tenant_id)
    }

    /// 断言记录属于本租户
    pub fn assert_owns<R: TenantOwned + ?Sized>(
        &self,
        record: &R,
        action: &str,
    ) -> Result<(), IsolationViolation> {
        assert_same_tenant(&self.tenant_id, record.tenant_id(), action)
    }

    pub fn query<F>(&self, filters: F) -> TenantQuery<F> {
        create_tenant_query(&self.tenant_id, filters)
    }

    pub fn wrap<T>(&self, data: T) -> TenantApiResponse<T> {
        wrap_tenant_response(data, &self.tenant_id)
    }
}

/// 创建绑定到 `tenant_id` 的数据访问器
pub fn create_tenant_data_accessor(tenant_id: &TenantId) -> TenantDataAccessor {
    TenantDataAccessor::new(tenant_id.clone())
}
