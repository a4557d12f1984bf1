//! 子编辑器提交的字段更新
//!
//! 每个更新只描述一个逻辑字段，由 reducer 合并进宿主持有的查询对象。
//! 序列化形式为 `{"field": ..., "value": ...}`，宿主可直接提交。

use serde::{Deserialize, Serialize};

use crate::property_filter::QueryTag;
use crate::query::{MeasurementQueryOptions, QueryType, TabIndex};
use crate::reference::PropertyType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum FieldUpdate {
    QueryType(QueryType),
    TabIndex(TabIndex),
    SeriesLimit(u32),
    Event(EventUpdate),
    Measurement(MeasurementUpdate),
    AssetMeasurement(AssetMeasurementUpdate),
    Raw(RawUpdate),
}

impl FieldUpdate {
    /// 该更新作用的查询体类型（不作用于查询体时为 `None`）。
    pub fn target(&self) -> Option<QueryType> {
        match self {
            Self::QueryType(_) | Self::TabIndex(_) | Self::SeriesLimit(_) => None,
            Self::Event(_) => Some(QueryType::EventQuery),
            Self::Measurement(_) => Some(QueryType::MeasurementQuery),
            Self::AssetMeasurement(_) => Some(QueryType::AssetMeasurementQuery),
            Self::Raw(_) => Some(QueryType::RawQuery),
        }
    }
}

/// 事件查询字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum EventUpdate {
    /// 级联选择器提交的资产选择器（UUID、`/regex/` 或模板变量）。
    Asset(String),
    EventTypes(Vec<String>),
    Statuses(Vec<String>),
    Properties(Vec<String>),
    /// WHERE 标签编辑结果，合并时按当前事件类型解析数据类型。
    PropertyTags(Vec<QueryTag>),
    PropertyType(PropertyType),
    IncludeParentInfo(bool),
    QueryAssetProperties(bool),
    OverrideAssets(Vec<String>),
    AssetProperties(Vec<String>),
    Options(MeasurementQueryOptions),
    Limit(Option<u32>),
}

/// 测点查询字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum MeasurementUpdate {
    Databases(Vec<String>),
    Measurements(Vec<String>),
    /// 正则模式开关与正则文本。
    Regex { regex: String, is_regex: bool },
    Options(MeasurementQueryOptions),
}

/// 资产测点查询字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum AssetMeasurementUpdate {
    /// 级联选择：资产选择器，可附带选中的资产属性。
    Asset {
        asset: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
    AssetProperties(Vec<String>),
    Options(MeasurementQueryOptions),
}

/// 原始查询字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum RawUpdate {
    Database(String),
    Query(String),
}

/// 上游选择变化时对下游选择的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownstreamPolicy {
    /// 保留下游选择（即使已不可用）。
    #[default]
    Sticky,
    /// 过滤掉已不可用的事件类型与属性。
    Prune,
}

impl DownstreamPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sticky" => Some(Self::Sticky),
            "prune" => Some(Self::Prune),
            _ => None,
        }
    }
}
