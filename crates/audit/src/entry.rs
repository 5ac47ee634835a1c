//! 审计事件与审计记录
//!
//! `AuditEvent` 是调用方提交的内容，`AuditEntry` 是后端封存后的不可变记录。
//! 封存时分配时间戳、序号，并把记录挂到所在分区的哈希链上。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use warden_common::TenantId;

use crate::error::{AuditError, AuditResult};

/// 分区第一条记录的 `prevHash`
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// 待记录的审计事件
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    tenant_id: TenantId,
    user_id: String,
    action: String,
    resource: String,
    resource_id: Option<String>,
    details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        tenant_id: TenantId,
        user_id: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            user_id: user_id.into(),
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            details: None,
        }
    }

    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// 已封存的审计记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub tenant_id: TenantId,
    pub user_id: String,
    pub action: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,

    /// 分区内从 0 开始的位置
    pub sequence: u64,
    pub prev_hash: String,
    pub hash: String,
}

impl AuditEntry {
    /// 把事件封存为分区中 `prev` 之后的下一条记录
    ///
    /// 调用方必须持有分区锁，保证 `prev` 确实是当前链尾。
    pub fn seal(event: AuditEvent, prev: Option<&AuditEntry>) -> Self {
        let (sequence, prev_hash) = match prev {
            Some(p) => (p.sequence + 1, p.hash.clone()),
            None => (0, GENESIS_HASH.to_string()),
        };

        let mut entry = Self {
            tenant_id: event.tenant_id,
            user_id: event.user_id,
            action: event.action,
            resource: event.resource,
            resource_id: event.resource_id,
            details: event.details,
            timestamp: Utc::now(),
            sequence,
            prev_hash,
            hash: String::new(),
        };
        entry.hash = entry.compute_hash();
        entry
    }

    /// 计算除 `hash` 以外所有字段的 SHA-256
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();

        hash_field(&mut hasher, self.tenant_id.as_str().as_bytes());
        hash_field(&mut hasher, self.user_id.as_bytes());
        hash_field(&mut hasher, self.action.as_bytes());
        hash_field(&mut hasher, self.resource.as_bytes());
        hash_optional(&mut hasher, self.resource_id.as_deref().map(str::as_bytes));
        let details = self.details.as_ref().map(|d| d.to_string());
        hash_optional(&mut hasher, details.as_deref().map(str::as_bytes));
        hash_field(
            &mut hasher,
            self.timestamp
                .to_rfc3339_opts(SecondsFormat::Nanos, true)
                .as_bytes(),
        );
        hash_field(&mut hasher, &self.sequence.to_le_bytes());
        hash_field(&mut hasher, self.prev_hash.as_bytes());

        hex::encode(hasher.finalize())
    }
}

/// 长度前缀，避免相邻字段拼接产生歧义
fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn hash_optional(hasher: &mut Sha256, bytes: Option<&[u8]>) {
    match bytes {
        Some(bytes) => {
            hasher.update([1u8]);
            hash_field(hasher, bytes);
        }
        None => hasher.update([0u8]),
    }
}

/// 校验一个分区的哈希链，返回第一处断裂的位置
pub fn verify_chain(tenant_id: &TenantId, entries: &[AuditEntry]) -> AuditResult<()> {
    let mut prev_hash = GENESIS_HASH;

    for (index, entry) in entries.iter().enumerate() {
        let sequence = index as u64;
        let intact = entry.tenant_id == *tenant_id
            && entry.sequence == sequence
            && entry.prev_hash == prev_hash
            && entry.hash == entry.compute_hash();

        if !intact {
            tracing::warn!(
                tenant_id = %tenant_id,
                sequence,
                "Audit chain integrity check failed"
            );
            return Err(AuditError::IntegrityViolation {
                tenant: tenant_id.clone(),
                sequence,
            });
        }
        prev_hash = &entry.hash;
    }

    Ok(())
}
