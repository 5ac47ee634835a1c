//! 展示层脱敏
//!
//! 单向操作，只保留有限长度的后缀。按字符（而非字节）计数。

/// 脱敏字符
pub const MASK_CHAR: char = '*';

/// 保留最后 `keep_suffix` 个字符，其余替换为 [`MASK_CHAR`]
///
/// 结果与输入的字符数相同。输入不长于 `keep_suffix` 时全部脱敏，不泄露任何字符。
pub fn mask_sensitive_data(value: &str, keep_suffix: usize) -> String {
    let len = value.chars().count();
    if len <= keep_suffix {
        return std::iter::repeat_n(MASK_CHAR, len).collect();
    }

    let masked = len - keep_suffix;
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < masked { MASK_CHAR } else { c })
        .collect()
}
