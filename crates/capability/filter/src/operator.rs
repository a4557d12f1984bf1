//! 按服务端版本开放的运算符与属性类型

use domain::{Operator, PropertyType};

use crate::semver::is_feature_enabled;

/// 扩展运算符开放的默认版本阈值。
pub const DEFAULT_EXTENDED_OPERATORS_VERSION: &str = "v7.2.0";

/// `duration` 过滤与带维度周期属性开放的默认版本阈值。
pub const DEFAULT_DURATION_FILTER_VERSION: &str = "v7.3.0";

pub const BASIC_OPERATORS: [Operator; 6] = [
    Operator::Eq,
    Operator::NotEq,
    Operator::Lt,
    Operator::Lte,
    Operator::Gt,
    Operator::Gte,
];

pub const EXTENDED_OPERATORS: [Operator; 8] = [
    Operator::Match,
    Operator::RegexNotMatch,
    Operator::In,
    Operator::NotIn,
    Operator::IsNull,
    Operator::IsNotNull,
    Operator::Exists,
    Operator::NotExists,
];

/// 当前版本可用的运算符；版本为空时只有基础运算符，预发布版本视为已满足阈值。
pub fn operators_for_version(version: &str, threshold: &str) -> Vec<Operator> {
    let mut operators = BASIC_OPERATORS.to_vec();
    if !version.is_empty() && is_feature_enabled(version, threshold, true) {
        operators.extend(EXTENDED_OPERATORS);
    }
    operators
}

/// simple 与 periodic 始终可用；periodic-with-dimension 需要达到 `threshold`。
pub fn is_supported_property_type(property_type: PropertyType, version: &str, threshold: &str) -> bool {
    match property_type {
        PropertyType::Simple | PropertyType::Periodic => true,
        PropertyType::PeriodicWithDimension => is_feature_enabled(version, threshold, true),
    }
}
