//! 租户隔离原语
//!
//! 包装、过滤与校验任意记录的租户归属。布尔形式（`validate_tenant_access`）
//! 用于调用方只需要分支的场景；断言形式（`assert_same_tenant`）用于必须
//! 失败即中止（fail closed）的场景。

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::error::IsolationViolation;
use crate::types::TenantId;

/// 携带租户标识的记录
pub trait TenantOwned {
    /// 记录所属的租户
    fn tenant_id(&self) -> &TenantId;
}

impl<T: TenantOwned + ?Sized> TenantOwned for &T {
    fn tenant_id(&self) -> &TenantId {
        (**self).tenant_id()
    }
}

impl<T: TenantOwned + ?Sized> TenantOwned for Box<T> {
    fn tenant_id(&self) -> &TenantId {
        (**self).tenant_id()
    }
}

impl<T: TenantOwned + ?Sized> TenantOwned for Arc<T> {
    fn tenant_id(&self) -> &TenantId {
        (**self).tenant_id()
    }
}

/// 附加了租户标识的任意记录
///
/// 序列化时 `tenantId` 与记录自身的字段平铺在同一层。租户标识在构造时设置，
/// 之后不会被原地修改；重新归属只能通过 [`TenantScoped::rescoped`] 得到新值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantScoped<T> {
    #[serde(rename = "tenantId")]
    tenant_id: TenantId,
    #[serde(flatten)]
    record: T,
}

impl<T> TenantScoped<T> {
    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn into_record(self) -> T {
        self.record
    }

    pub fn into_parts(self) -> (TenantId, T) {
        (self.tenant_id, self.record)
    }

    /// 复制记录并覆盖租户标识，原值保持不变
    pub fn rescoped(&self, tenant_id: &TenantId) -> Self
    where
        T: Clone,
    {
        scope_to_tenant(self.record.clone(), tenant_id)
    }
}

impl<T> TenantOwned for TenantScoped<T> {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

impl<T> Deref for TenantScoped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

/// 为记录附加租户标识
///
/// 不校验标识格式；来自用户输入的标识应在上游通过 `TenantId::parse` 校验。
pub fn scope_to_tenant<T>(record: T, tenant_id: &TenantId) -> TenantScoped<T> {
    TenantScoped {
        tenant_id: tenant_id.clone(),
        record,
    }
}

/// 过滤出属于指定租户的记录，保持原有相对顺序
pub fn filter_by_tenant<I, R>(records: I, tenant_id: &TenantId) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: TenantOwned,
{
    let mut total = 0usize;
    let kept: Vec<R> = records
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|record| record.tenant_id() == tenant_id)
        .collect();
    trace!(tenant_id = %tenant_id, kept = kept.len(), total, "filtered records by tenant");
    kept
}

/// 检查记录是否属于指定租户
pub fn validate_tenant_access<R: TenantOwned + ?Sized>(record: &R, tenant_id: &TenantId) -> bool {
    record.tenant_id() == tenant_id
}

/// 断言两个租户标识一致，否则返回 [`IsolationViolation`]
pub fn assert_same_tenant(
    expected: &TenantId,
    actual: &TenantId,
    action: &str,
) -> Result<(), IsolationViolation> {
    if expected == actual {
        return Ok(());
    }
    warn!(
        expected = %expected,
        actual = %actual,
        action,
        "cross-tenant access denied"
    );
    Err(IsolationViolation::new(expected, actual, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct CaseNote {
        id: u32,
        body: String,
    }

    fn note(id: u32) -> CaseNote {
        CaseNote {
            id,
            body: format!("note {id}"),
        }
    }

    fn mixed_records(a: &TenantId, b: &TenantId) -> Vec<TenantScoped<CaseNote>> {
        (0..10)
            .map(|i| scope_to_tenant(note(i), if i % 3 == 0 { b } else { a }))
            .collect()
    }

    #[test]
    fn test_filter_partitions_records() {
        let a = TenantId::new("tenant-a");
        let b = TenantId::new("tenant-b");
        let records = mixed_records(&a, &b);

        let only_a = filter_by_tenant(records.iter(), &a);
        let only_b = filter_by_tenant(records.iter(), &b);

        assert!(only_a.iter().all(|r| r.tenant_id() == &a));
        assert!(only_b.iter().all(|r| r.tenant_id() == &b));
        assert_eq!(only_a.len() + only_b.len(), records.len());

        // 保持相对顺序
        let ids: Vec<u32> = only_a.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn test_filter_unknown_tenant_is_empty() {
        let a = TenantId::new("tenant-a");
        let b = TenantId::new("tenant-b");
        let records = mixed_records(&a, &b);
        assert!(filter_by_tenant(records, &TenantId::new("tenant-c")).is_empty());
    }

    #[test]
    fn test_validate_tenant_access() {
        let a = TenantId::new("tenant-a");
        let b = TenantId::new("tenant-b");
        let record = scope_to_tenant(note(1), &a);
        assert!(validate_tenant_access(&record, &a));
        assert!(!validate_tenant_access(&record, &b));
    }

    #[test]
    fn test_assert_same_tenant() {
        let a = TenantId::new("tenant-a");
        let b = TenantId::new("tenant-b");
        assert!(assert_same_tenant(&a, &a, "read").is_ok());

        let err = assert_same_tenant(&a, &b, "read").unwrap_err();
        assert_eq!(err.action, "read");
        assert_eq!(err.expected, a);
        assert_eq!(err.actual, b);
        assert!(err.to_string().contains("Cross-tenant access denied"));
    }

    #[test]
    fn test_rescoped_leaves_original_untouched() {
        let a = TenantId::new("tenant-a");
        let b = TenantId::new("tenant-b");
        let original = scope_to_tenant(note(7), &a);
        let moved = original.rescoped(&b);
        assert_eq!(original.tenant_id(), &a);
        assert_eq!(moved.tenant_id(), &b);
        assert_eq!(moved.record(), original.record());
    }

    #[test]
    fn test_scoped_serializes_flat() {
        let scoped = scope_to_tenant(note(3), &TenantId::new("acme"));
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tenantId": "acme", "id": 3, "body": "note 3"})
        );

        let back: TenantScoped<CaseNote> = serde_json::from_value(json).unwrap();
        assert_eq!(back, scoped);
    }
}
