//! 权限令牌
//!
//! 形如 `resource:action` 的预先枚举的权限，运行时不会合成新权限。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// 权限令牌
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
    IntoStaticStr,
)]
pub enum Permission {
    #[serde(rename = "case:read")]
    #[strum(serialize = "case:read")]
    CaseRead,
    #[serde(rename = "case:create")]
    #[strum(serialize = "case:create")]
    CaseCreate,
    #[serde(rename = "case:update")]
    #[strum(serialize = "case:update")]
    CaseUpdate,
    #[serde(rename = "case:delete")]
    #[strum(serialize = "case:delete")]
    CaseDelete,
    #[serde(rename = "case:export")]
    #[strum(serialize = "case:export")]
    CaseExport,
    #[serde(rename = "case:share")]
    #[strum(serialize = "case:share")]
    CaseShare,
    #[serde(rename = "evidence:read")]
    #[strum(serialize = "evidence:read")]
    EvidenceRead,
    #[serde(rename = "evidence:upload")]
    #[strum(serialize = "evidence:upload")]
    EvidenceUpload,
    #[serde(rename = "report:read")]
    #[strum(serialize = "report:read")]
    ReportRead,
    #[serde(rename = "report:export")]
    #[strum(serialize = "report:export")]
    ReportExport,
    #[serde(rename = "ai:use")]
    #[strum(serialize = "ai:use")]
    AiUse,
    #[serde(rename = "ai:configure")]
    #[strum(serialize = "ai:configure")]
    AiConfigure,
    #[serde(rename = "audit:read")]
    #[strum(serialize = "audit:read")]
    AuditRead,
    #[serde(rename = "user:invite")]
    #[strum(serialize = "user:invite")]
    UserInvite,
    #[serde(rename = "user:manage")]
    #[strum(serialize = "user:manage")]
    UserManage,
    #[serde(rename = "admin:settings")]
    #[strum(serialize = "admin:settings")]
    AdminSettings,
    #[serde(rename = "admin:billing")]
    #[strum(serialize = "admin:billing")]
    AdminBilling,
    #[serde(rename = "admin:api")]
    #[strum(serialize = "admin:api")]
    AdminApi,
    /// 租户级破坏性操作，例如清空审计分区
    #[serde(rename = "admin:tenant")]
    #[strum(serialize = "admin:tenant")]
    AdminTenant,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// 令牌中的资源部分
    pub fn resource(self) -> &'static str {
        let token = self.as_str();
        token.split_once(':').map_or(token, |(resource, _)| resource)
    }

    /// 令牌中的动作部分
    pub fn action(self) -> &'static str {
        let token = self.as_str();
        token.split_once(':').map_or("", |(_, action)| action)
    }

    /// 是否为 `admin:*` 权限
    pub fn is_admin(self) -> bool {
        self.resource() == "admin"
    }
}
