//! QueryTag ⇄ EventPropertyFilter
//!
//! 标签行是 WHERE 条件的编辑形式；持久化时转换回结构化条件，
//! 数据类型按当前参考数据重新解析，不随标签携带。

use domain::{Condition, EventPropertyFilter, Operator, PropertyDatatype, QueryTag};

use crate::pattern::is_regex;

/// 父事件属性的键前缀。
pub const PARENT_PREFIX: &str = "parent:";

/// 新增标签时的占位值。
pub const NEW_TAG_VALUE: &str = "select tag value";

/// 拆分 `parent:` 前缀，返回（是否父属性，属性名）。
pub fn split_parent(key: &str) -> (bool, &str) {
    match key.strip_prefix(PARENT_PREFIX) {
        Some(name) => (true, name),
        None => (false, key),
    }
}

/// 结构化条件 → 标签行，一一对应且保持顺序。
pub fn to_tags(filters: &[EventPropertyFilter]) -> Vec<QueryTag> {
    filters
        .iter()
        .map(|filter| QueryTag {
            key: filter.property.clone(),
            value: if filter.operator.needs_value() {
                filter.value.clone().unwrap_or_default()
            } else {
                String::new()
            },
            operator: Some(filter.operator.clone()),
            condition: (!filter.condition.is_none()).then_some(filter.condition),
        })
        .collect()
}

/// 标签行 → 结构化条件。
///
/// `resolver(name, is_parent)` 给出属性的数据类型；`Property` 保留原始键（含 `parent:`）。
pub fn from_tags<F>(tags: &[QueryTag], resolver: F) -> Vec<EventPropertyFilter>
where
    F: Fn(&str, bool) -> PropertyDatatype,
{
    tags.iter()
        .map(|tag| {
            let (parent, name) = split_parent(&tag.key);
            let operator = tag.operator.clone().unwrap_or_default();
            let value = operator.needs_value().then(|| tag.value.clone());
            EventPropertyFilter {
                property: tag.key.clone(),
                datatype: resolver(name, parent),
                condition: tag.condition.unwrap_or_default(),
                operator,
                value,
                parent,
            }
        })
        .collect()
}

/// 值变化时调整运算符：正则形式的值使用 `=~`（已是 `!~` 则保留），
/// 非正则值把正则运算符还原为 `=`，其余运算符不变。
pub fn adjust_operator(current: &Operator, new_value: &str) -> Operator {
    match (is_regex(new_value), current.is_regex()) {
        (true, true) => current.clone(),
        (true, false) => Operator::RegexMatch,
        (false, true) => Operator::Eq,
        (false, false) => current.clone(),
    }
}

/// 编辑标签值，并按新值调整运算符。
pub fn edit_tag_value(tag: &QueryTag, value: &str) -> QueryTag {
    let operator = adjust_operator(&tag_operator(tag), value);
    QueryTag {
        value: value.to_string(),
        operator: Some(operator),
        ..tag.clone()
    }
}

/// 显示用运算符：显式设置优先，否则正则形式的值为 `=~`，其余为 `=`。
pub fn tag_operator(tag: &QueryTag) -> Operator {
    match &tag.operator {
        Some(operator) => operator.clone(),
        None if is_regex(&tag.value) => Operator::RegexMatch,
        None => Operator::Eq,
    }
}

/// 显示用条件：首行没有条件，其余默认 `AND`。
pub fn tag_condition(tag: &QueryTag, is_first: bool) -> Option<Condition> {
    if is_first {
        return None;
    }
    match tag.condition {
        Some(condition) if !condition.is_none() => Some(condition),
        _ => Some(Condition::And),
    }
}

/// 新增的标签行。
pub fn new_tag(key: &str, is_first: bool) -> QueryTag {
    let minimal = QueryTag::new(key, NEW_TAG_VALUE);
    QueryTag {
        operator: Some(tag_operator(&minimal)),
        condition: tag_condition(&minimal, is_first),
        ..minimal
    }
}

/// 替换第 `index` 行；越界时原样返回。
pub fn set_tag(tags: &[QueryTag], index: usize, tag: QueryTag) -> Vec<QueryTag> {
    let mut updated = tags.to_vec();
    if let Some(slot) = updated.get_mut(index) {
        *slot = tag;
    }
    updated
}

pub fn remove_tag(tags: &[QueryTag], index: usize) -> Vec<QueryTag> {
    tags.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, tag)| tag.clone())
        .collect()
}

/// 追加新标签（首行不带条件）。
pub fn push_tag(tags: &[QueryTag], key: &str) -> Vec<QueryTag> {
    let mut updated = tags.to_vec();
    updated.push(new_tag(key, tags.is_empty()));
    updated
}
