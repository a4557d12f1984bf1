//! 测点查询的 WHERE 标签与值过滤条件

use std::collections::BTreeMap;

use domain::{Condition, QueryTag, ValueFilter};

/// 标签行 → 测点标签映射（同键后者覆盖前者）。
pub fn tags_to_measurement_tags(tags: &[QueryTag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}

pub fn measurement_tags_to_tags(tags: &BTreeMap<String, String>) -> Vec<QueryTag> {
    tags.iter()
        .map(|(key, value)| QueryTag::new(key.clone(), value.clone()))
        .collect()
}

/// 值过滤条件 → 标签行，键固定为 `value`。
pub fn value_filters_to_tags(filters: &[ValueFilter]) -> Vec<QueryTag> {
    filters
        .iter()
        .map(|filter| QueryTag {
            key: "value".to_string(),
            value: filter.value.clone(),
            operator: Some(filter.operator.clone()),
            condition: (!filter.condition.is_none()).then_some(filter.condition),
        })
        .collect()
}

pub fn tags_to_value_filters(tags: &[QueryTag]) -> Vec<ValueFilter> {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| ValueFilter {
            value: tag.value.clone(),
            operator: tag.operator.clone().unwrap_or_default(),
            condition: if index == 0 {
                Condition::None
            } else {
                tag.condition.unwrap_or(Condition::And)
            },
        })
        .collect()
}
