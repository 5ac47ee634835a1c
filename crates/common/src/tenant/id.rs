//! 租户标识校验与生成
//!
//! 合法的租户标识有两种形式：
//! - 小写 UUID v4（`xxxxxxxx-xxxx-4xxx-[89ab]xxx-xxxxxxxxxxxx`）
//! - DNS label 风格的 slug：小写字母、数字与连字符，长度至少 3，首尾不能是连字符
//!
//! 本模块只做校验与派生，从不创建租户记录，也从不返回错误。

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::types::TenantId;

/// slug 的最大长度
pub const MAX_SLUG_LEN: usize = 50;

/// slug 形式标识的最小长度
pub const MIN_SLUG_LEN: usize = 3;

static UUID_V4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid pattern is a valid regex")
});

static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("slug pattern is a valid regex")
});

static NON_SLUG_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is a valid regex"));

/// 检查租户标识是否合法
pub fn is_valid_tenant_id(id: &str) -> bool {
    if UUID_V4_PATTERN.is_match(id) {
        return true;
    }
    id.len() >= MIN_SLUG_LEN && SLUG_PATTERN.is_match(id)
}

/// 生成新的租户标识（UUID v4）
pub fn generate_tenant_id() -> TenantId {
    TenantId::new(Uuid::new_v4().to_string())
}

/// 将任意输入规范化为 URL 安全的 slug
///
/// 转小写，非 `[a-z0-9]` 的连续片段替换为单个连字符，去掉首尾连字符，
/// 截断到 [`MAX_SLUG_LEN`]。截断后暴露出的尾部连字符同样会被去掉，
/// 因此该函数是幂等的。
pub fn sanitize_tenant_slug(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = NON_SLUG_RUN.replace_all(&lowered, "-");
    let truncated: String = replaced
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    truncated.trim_end_matches('-').to_string()
}
