//! 请求前的过滤条件校验

use historian_filter::{is_regex, is_valid_regex};

/// 值形如 `/regex/` 但无法编译。
pub fn rejects_pattern(value: Option<&str>) -> bool {
    value.is_some_and(|value| is_regex(value) && !is_valid_regex(value))
}
