use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tenant::id::{generate_tenant_id, is_valid_tenant_id};

/// 租户标识
///
/// 不透明字符串。`TenantId::new` 不做校验（与隔离访问器的约定一致，
/// 来自用户输入的标识应先经过 `TenantId::parse`）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// 不做校验地构造租户标识
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 校验并构造租户标识
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        if is_valid_tenant_id(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(ValidationError::invalid_format("tenant_id", id))
        }
    }

    /// 生成新的 UUID v4 租户标识
    pub fn generate() -> Self {
        generate_tenant_id()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// 是否满足租户标识语法
    pub fn is_valid(&self) -> bool {
        is_valid_tenant_id(&self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for TenantId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq<str> for TenantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TenantId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
