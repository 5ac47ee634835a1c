//! 租户查询与响应信封
//!
//! `TenantQuery` 把租户作用域与调用方的过滤条件绑定在一起交给数据层，
//! 数据层必须把其中的租户标识当作强制谓词。`TenantApiResponse` 标明载荷
//! 由哪个租户上下文产生，供响应侧校验。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::IsolationViolation;
use super::isolation::{TenantOwned, assert_same_tenant, validate_tenant_access};
use crate::types::TenantId;

/// 租户作用域查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery<F = serde_json::Value> {
    tenant_id: TenantId,
    filters: F,
}

impl<F> TenantQuery<F> {
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn into_parts(self) -> (TenantId, F) {
        (self.tenant_id, self.filters)
    }

    /// 记录是否满足查询中的租户谓词
    pub fn admits<R: TenantOwned + ?Sized>(&self, record: &R) -> bool {
        validate_tenant_access(record, &self.tenant_id)
    }
}

/// 构造租户查询
pub fn create_tenant_query<F>(tenant_id: &TenantId, filters: F) -> TenantQuery<F> {
    TenantQuery {
        tenant_id: tenant_id.clone(),
        filters,
    }
}

/// 租户响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantApiResponse<T> {
    tenant_id: TenantId,
    data: T,
    timestamp: DateTime<Utc>,
}

impl<T> TenantApiResponse<T> {
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 校验信封来自预期租户后返回载荷引用
    pub fn verify(&self, expected: &TenantId) -> Result<&T, IsolationViolation> {
        assert_same_tenant(expected, &self.tenant_id, "response")?;
        Ok(&self.data)
    }

    /// 校验信封来自预期租户后取出载荷
    pub fn into_verified(self, expected: &TenantId) -> Result<T, IsolationViolation> {
        assert_same_tenant(expected, &self.tenant_id, "response")?;
        Ok(self.data)
    }
}

/// 用租户信封包装响应数据，时间戳取当前时间
pub fn wrap_tenant_response<T>(data: T, tenant_id: &TenantId) -> TenantApiResponse<T> {
    TenantApiResponse {
        tenant_id: tenant_id.clone(),
        data,
        timestamp: Utc::now(),
    }
}
