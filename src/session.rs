//! 租户会话
//!
//! 把隔离访问器、角色权限表、审计日志和字段保护组合在一起，
//! 对每个请求执行：认证上下文 → 租户访问器 → 权限检查 → 读写 → 审计。

use serde_json::{Value, json};
use tracing::{debug, warn};
use warden_audit::{AuditConfig, AuditEntry, AuditEvent, AuditLog, AuditQuery};
use warden_common::{
    Permission, Role, RolePermissions, TenantApiResponse, TenantDataAccessor, TenantId,
    TenantOwned, TenantQuery, TenantScoped, ValidationError, create_tenant_data_accessor,
};
use warden_vault::{EncryptedValue, FieldProtector, MasterKey, mask_sensitive_data};

use crate::config::WardenConfig;
use crate::error::{WardenError, WardenResult};

pub const ACTION_PERMISSION_DENIED: &str = "permission.denied";
pub const ACTION_ISOLATION_VIOLATION: &str = "isolation.violation";
pub const ACTION_AUDIT_CLEAR: &str = "audit.clear";

/// 会话工厂，持有进程级共享的审计日志与主密钥
#[derive(Debug, Clone)]
pub struct Warden {
    audit: AuditLog,
    master_key: Option<MasterKey>,
}

impl Warden {
    /// 创建会话工厂，先检查权限表满足层级约定
    pub fn new(audit: AuditLog, master_key: Option<MasterKey>) -> WardenResult<Self> {
        RolePermissions::verify_hierarchy()?;
        Ok(Self { audit, master_key })
    }

    pub fn from_config(config: &WardenConfig) -> WardenResult<Self> {
        let audit = AuditLog::from_config(&config.audit)?;
        let master_key = config.vault.load_master_key()?;
        Self::new(audit, master_key)
    }

    /// 只使用内存审计、不带主密钥
    pub fn in_memory() -> WardenResult<Self> {
        Self::new(AuditLog::from_config(&AuditConfig::default())?, None)
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn has_master_key(&self) -> bool {
        self.master_key.is_some()
    }

    /// 为已认证的用户打开租户会话
    ///
    /// 租户标识来自认证上下文，这里仍然校验格式，因为它可能成为存储分区名。
    pub fn session(
        &self,
        tenant_id: TenantId,
        user_id: impl Into<String>,
        role: Role,
    ) -> WardenResult<TenantSession> {
        if !tenant_id.is_valid() {
            return Err(ValidationError::invalid_format("tenant_id", tenant_id.as_str()).into());
        }

        let protector = match &self.master_key {
            Some(master) => Some(FieldProtector::new(&master.tenant_key(&tenant_id)?)),
            None => None,
        };

        let user_id = user_id.into();
        debug!(tenant_id = %tenant_id, user_id = %user_id, role = %role, "Tenant session opened");

        Ok(TenantSession {
            accessor: create_tenant_data_accessor(&tenant_id),
            user_id,
            role,
            audit: self.audit.clone(),
            protector,
        })
    }
}

/// 绑定到单一租户、单一用户的会话
#[derive(Debug, Clone)]
pub struct TenantSession {
    accessor: TenantDataAccessor,
    user_id: String,
    role: Role,
    audit: AuditLog,
    protector: Option<FieldProtector>,
}

impl TenantSession {
    pub fn tenant_id(&self) -> &TenantId {
        self.accessor.tenant_id()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn accessor(&self) -> &TenantDataAccessor {
        &self.accessor
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    fn event(&self, action: impl Into<String>, resource: impl Into<String>) -> AuditEvent {
        AuditEvent::new(
            self.tenant_id().clone(),
            self.user_id.clone(),
            action,
            resource,
        )
    }

    /// 权限检查，失败时记录 `permission.denied`
    pub fn authorize(
        &self,
        permission: Permission,
        resource: &str,
        resource_id: Option<&str>,
    ) -> WardenResult<()> {
        if self.can(permission) {
            return Ok(());
        }

        warn!(
            tenant_id = %self.tenant_id(),
            user_id = %self.user_id,
            role = %self.role,
            permission = %permission,
            "Permission denied"
        );

        let mut event = self
            .event(ACTION_PERMISSION_DENIED, resource)
            .details(json!({ "permission": permission, "role": self.role }));
        if let Some(id) = resource_id {
            event = event.resource_id(id);
        }
        if let Err(e) = self.audit.create_audit_entry(event) {
            warn!(
                tenant_id = %self.tenant_id(),
                error = %e,
                "Failed to audit permission denial"
            );
        }

        Err(WardenError::PermissionDenied {
            role: self.role,
            permission,
        })
    }

    /// 过滤出本租户的记录并记录 `<resource>.read`
    pub fn read<I, R>(&self, records: I, resource: &str) -> WardenResult<Vec<R>>
    where
        I: IntoIterator<Item = R>,
        R: TenantOwned,
    {
        let kept = self.accessor.filter(records);
        self.audit.create_audit_entry(
            self.event(format!("{resource}.read"), resource)
                .details(json!({ "count": kept.len() })),
        )?;
        Ok(kept)
    }

    /// 把数据交给另一个租户上下文之前的断言
    ///
    /// 违规时先在调用方租户的分区里记录 `isolation.violation`，再返回错误。
    /// 审计写入失败只记日志，返回的仍然是隔离错误。
    pub fn hand_off(&self, actual: &TenantId, action: &str) -> WardenResult<()> {
        let Err(violation) = warden_common::assert_same_tenant(self.tenant_id(), actual, action)
        else {
            return Ok(());
        };

        let event = self
            .event(ACTION_ISOLATION_VIOLATION, action)
            .details(json!({ "actual": actual, "action": action }));
        if let Err(e) = self.audit.create_audit_entry(event) {
            warn!(
                tenant_id = %self.tenant_id(),
                error = %e,
                "Failed to audit isolation violation"
            );
        }
        Err(violation.into())
    }

    /// 断言记录属于本租户
    pub fn assert_owns<R: TenantOwned + ?Sized>(
        &self,
        record: &R,
        action: &str,
    ) -> WardenResult<()> {
        self.hand_off(record.tenant_id(), action)
    }

    /// 校验响应信封后取出数据
    pub fn receive<T>(&self, response: TenantApiResponse<T>) -> WardenResult<T> {
        self.hand_off(response.tenant_id(), "response")?;
        Ok(response.into_verified(self.tenant_id())?)
    }

    pub fn scope<T>(&self, record: T) -> TenantScoped<T> {
        self.accessor.scope(record)
    }

    pub fn query<F>(&self, filters: F) -> TenantQuery<F> {
        self.accessor.query(filters)
    }

    pub fn wrap<T>(&self, data: T) -> TenantApiResponse<T> {
        self.accessor.wrap(data)
    }

    /// 写操作完成后记录审计
    pub fn record(
        &self,
        action: &str,
        resource: &str,
        resource_id: Option<&str>,
        details: Option<Value>,
    ) -> WardenResult<AuditEntry> {
        let mut event = self.event(action, resource);
        if let Some(id) = resource_id {
            event = event.resource_id(id);
        }
        if let Some(details) = details {
            event = event.details(details);
        }
        Ok(self.audit.create_audit_entry(event)?)
    }

    fn protector(&self) -> WardenResult<&FieldProtector> {
        self.protector.as_ref().ok_or(WardenError::VaultUnavailable)
    }

    /// 用本租户的派生密钥加密敏感字段
    pub fn protect(&self, plaintext: &str) -> WardenResult<EncryptedValue> {
        Ok(self.protector()?.encrypt(plaintext)?)
    }

    /// 解密敏感字段；未打标签的值原样返回，密钥不匹配返回 `None`
    pub fn reveal(&self, value: &str) -> WardenResult<Option<String>> {
        Ok(self.protector()?.decrypt(value))
    }

    pub fn mask(&self, value: &str, keep_suffix: usize) -> String {
        mask_sensitive_data(value, keep_suffix)
    }

    /// 查询本租户的审计日志，需要 `audit:read`
    pub fn audit_log(&self, query: &AuditQuery) -> WardenResult<Vec<AuditEntry>> {
        self.authorize(Permission::AuditRead, "audit", None)?;
        Ok(self.audit.get_audit_log(self.tenant_id(), query)?)
    }

    /// 清空本租户的审计分区，需要 `admin:tenant`
    ///
    /// 清空后 `audit.clear` 成为新链的第 0 条，`details` 带上被清掉的条数和旧链尾哈希。
    pub fn clear_audit_log(&self) -> WardenResult<AuditEntry> {
        self.authorize(Permission::AdminTenant, "audit", None)?;

        let previous = self.audit.get_audit_log(self.tenant_id(), &AuditQuery::new())?;
        let previous_hash = previous.last().map(|entry| entry.hash.clone());
        self.audit.clear_audit_log(Some(self.tenant_id()))?;

        Ok(self.audit.create_audit_entry(
            self.event(ACTION_AUDIT_CLEAR, "audit").details(json!({
                "entries": previous.len(),
                "previousHash": previous_hash,
            })),
        )?)
    }
}
