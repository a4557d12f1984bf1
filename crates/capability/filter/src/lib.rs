//! 过滤条件模型
//!
//! - [`semver`]：服务端版本解析与比较（功能门控）
//! - [`operator`]：按版本开放的运算符集合、属性类型门控
//! - [`pattern`]：`/regex/` 字面量、UUID 识别
//! - [`tags`]：QueryTag ⇄ EventPropertyFilter 双向转换与标签编辑
//! - [`measurement`]：测点 WHERE 标签与值过滤条件

pub mod measurement;
pub mod operator;
pub mod pattern;
pub mod semver;
pub mod tags;

pub use measurement::{
    measurement_tags_to_tags, tags_to_measurement_tags, tags_to_value_filters,
    value_filters_to_tags,
};
pub use operator::{
    BASIC_OPERATORS, DEFAULT_DURATION_FILTER_VERSION, DEFAULT_EXTENDED_OPERATORS_VERSION,
    EXTENDED_OPERATORS, is_supported_property_type, operators_for_version,
};
pub use pattern::{compile_selector, is_regex, is_uuid, is_valid_regex, regex_body};
pub use semver::{SemVer, is_feature_enabled, semver_compare};
pub use tags::{
    NEW_TAG_VALUE, PARENT_PREFIX, adjust_operator, edit_tag_value, from_tags, new_tag,
    push_tag, remove_tag, set_tag, split_parent, tag_condition, tag_operator, to_tags,
};
