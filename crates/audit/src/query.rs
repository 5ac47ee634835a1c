//! 审计日志查询条件

use serde::{Deserialize, Serialize};

use crate::entry::AuditEntry;

/// 审计日志查询
///
/// 先按 `action` 精确过滤，再跳过 `offset` 条，最后最多取 `limit` 条。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action
            .as_deref()
            .is_none_or(|action| entry.action == action)
    }

    /// 对一个分区（按插入顺序）应用查询
    pub fn apply<I>(&self, entries: I) -> Vec<AuditEntry>
    where
        I: IntoIterator<Item = AuditEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}
