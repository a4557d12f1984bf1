//! `/regex/` 字面量与 UUID 识别

use regex::Regex;
use uuid::Uuid;

/// 以 `/` 开头并以 `/` 结尾（长度至少 2）。
pub fn is_regex(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('/') && value.ends_with('/')
}

/// `/…/` 内的模式文本。
pub fn regex_body(value: &str) -> Option<&str> {
    if is_regex(value) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

pub fn is_valid_regex(value: &str) -> bool {
    regex_body(value).is_some_and(|body| Regex::new(body).is_ok())
}

/// 将 `/pattern/` 编译为整串匹配的 `^(?:pattern)$`；非正则形式或编译失败返回 `None`。
pub fn compile_selector(value: &str) -> Option<Regex> {
    let body = regex_body(value)?;
    Regex::new(&format!("^(?:{body})$")).ok()
}

/// 连字符形式的 UUID。
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}
