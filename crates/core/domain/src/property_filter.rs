//! WHERE 条件模型
//!
//! - [`EventPropertyFilter`]：持久化形式（结构化条件）
//! - [`QueryTag`]：编辑形式（扁平、有序的标签行）
//! - [`ValueFilter`]：测点值过滤条件

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::reference::PropertyDatatype;

/// 比较运算符。未知字符串原样保留为 `Other`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    RegexMatch,
    RegexNotMatch,
    Match,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Exists,
    NotExists,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::RegexMatch => "=~",
            Self::RegexNotMatch => "!~",
            Self::Match => "~",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "=" => Self::Eq,
            "!=" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "=~" => Self::RegexMatch,
            "!~" => Self::RegexNotMatch,
            "~" => Self::Match,
            "IN" => Self::In,
            "NOT IN" => Self::NotIn,
            "IS NULL" => Self::IsNull,
            "IS NOT NULL" => Self::IsNotNull,
            "EXISTS" => Self::Exists,
            "NOT EXISTS" => Self::NotExists,
            other => Self::Other(other.to_string()),
        }
    }

    /// `IS NULL`、`IS NOT NULL`、`EXISTS`、`NOT EXISTS` 不带值。
    pub fn needs_value(&self) -> bool {
        !matches!(
            self,
            Self::IsNull | Self::IsNotNull | Self::Exists | Self::NotExists
        )
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::RegexMatch | Self::RegexNotMatch)
    }

    /// `IN` / `NOT IN` 的值是逗号分隔列表。
    pub fn is_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Operator {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Operator {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        value.as_str().to_string()
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// 条件连接词，首个条件为空。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[default]
    #[serde(rename = "")]
    None,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::None => "",
        }
    }

    /// 空字符串或未知值视为无条件。
    pub fn parse(raw: &str) -> Self {
        match raw {
            "AND" => Self::And,
            "OR" => Self::Or,
            _ => Self::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// 事件属性过滤条件（持久化形式）。
///
/// `Value` 在编辑期统一为字符串；数字与布尔在反序列化时被转换为字符串，
/// 执行前再按 `Datatype` 还原。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventPropertyFilter {
    pub property: String,
    #[serde(default)]
    pub datatype: PropertyDatatype,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub operator: Operator,
    #[serde(
        default,
        deserialize_with = "lenient_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parent: bool,
}

/// 标签行（编辑形式）。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl QueryTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator: None,
            condition: None,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// 测点值过滤条件。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueFilter {
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub condition: Condition,
}

fn stringify(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(stringify(value))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(stringify(value).unwrap_or_default())
}
