//! 宿主持有的查询对象
//!
//! 查询体按 `queryType` 区分：测点查询、资产测点查询、事件查询、原始查询。
//! 编辑器从不持有权威副本，每次变更后整体交还宿主。

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::property_filter::{EventPropertyFilter, ValueFilter};
use crate::reference::PropertyType;

/// 聚合配置。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Aggregation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// 测点查询选项（测点、资产测点、事件资产属性共用）。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MeasurementQueryOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "GroupBy", deserialize_with = "null_as_default")]
    pub group_by: Vec<String>,
    pub include_last_known_point: bool,
    pub fill_initial_empty_values: bool,
    pub use_engineering_specs: bool,
    pub display_database_name: bool,
    pub display_description: bool,
    pub metadata_as_labels: bool,
    pub changes_only: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub value_filters: Vec<ValueFilter>,
    #[serde(deserialize_with = "null_as_default")]
    pub datatypes: Vec<String>,
}

impl MeasurementQueryOptions {
    /// 新查询的默认选项：告警场景取最新值且不分组，否则按周期求均值并按状态分组。
    pub fn default_for(alerting: bool) -> Self {
        if alerting {
            Self {
                aggregation: Some(Aggregation {
                    name: "last".to_string(),
                    period: Some("$__interval".to_string()),
                    ..Aggregation::default()
                }),
                ..Self::default()
            }
        } else {
            Self {
                aggregation: Some(Aggregation {
                    name: "mean".to_string(),
                    period: Some("$__interval".to_string()),
                    ..Aggregation::default()
                }),
                group_by: vec!["status".to_string()],
                ..Self::default()
            }
        }
    }
}

/// 测点查询。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MeasurementQuery {
    #[serde(deserialize_with = "null_as_default")]
    pub databases: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub measurements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub options: MeasurementQueryOptions,
    pub regex: String,
    pub is_regex: bool,
}

/// 资产测点查询。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssetMeasurementQuery {
    #[serde(deserialize_with = "null_as_default")]
    pub assets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub asset_properties: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub options: MeasurementQueryOptions,
}

/// 事件查询。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventQuery {
    #[serde(rename = "Type")]
    pub property_type: PropertyType,
    #[serde(deserialize_with = "null_as_default")]
    pub assets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub event_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub statuses: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub properties: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub property_filter: Vec<EventPropertyFilter>,
    #[serde(deserialize_with = "null_as_default")]
    pub include_parent_info: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub query_asset_properties: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub override_assets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub asset_properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MeasurementQueryOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// 原始查询。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawQuery {
    pub timeseries_database: String,
    pub query: String,
}

/// 查询类型标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryType {
    MeasurementQuery,
    AssetMeasurementQuery,
    EventQuery,
    RawQuery,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MeasurementQuery => "MeasurementQuery",
            Self::AssetMeasurementQuery => "AssetMeasurementQuery",
            Self::EventQuery => "EventQuery",
            Self::RawQuery => "RawQuery",
        }
    }

    /// 该类型对应的空查询体。
    pub fn empty_body(&self) -> QueryBody {
        match self {
            Self::MeasurementQuery => QueryBody::MeasurementQuery(MeasurementQuery::default()),
            Self::AssetMeasurementQuery => {
                QueryBody::AssetMeasurementQuery(AssetMeasurementQuery::default())
            }
            Self::EventQuery => QueryBody::EventQuery(EventQuery::default()),
            Self::RawQuery => QueryBody::RawQuery(RawQuery::default()),
        }
    }

    /// 按该类型解析 `query` 内容；缺失或 `null` 视为空查询体。
    pub fn parse_body(&self, query: Option<serde_json::Value>) -> serde_json::Result<QueryBody> {
        let query = match query {
            Some(serde_json::Value::Null) | None => return Ok(self.empty_body()),
            Some(query) => query,
        };
        Ok(match self {
            Self::MeasurementQuery => QueryBody::MeasurementQuery(serde_json::from_value(query)?),
            Self::AssetMeasurementQuery => {
                QueryBody::AssetMeasurementQuery(serde_json::from_value(query)?)
            }
            Self::EventQuery => QueryBody::EventQuery(serde_json::from_value(query)?),
            Self::RawQuery => QueryBody::RawQuery(serde_json::from_value(query)?),
        })
    }

    /// 编辑器中承载该类型的页签。
    pub fn tab(&self) -> TabIndex {
        match self {
            Self::AssetMeasurementQuery => TabIndex::Assets,
            Self::MeasurementQuery => TabIndex::Measurements,
            Self::EventQuery => TabIndex::Events,
            Self::RawQuery => TabIndex::RawQuery,
        }
    }
}

/// 查询体：`queryType` 为标签，内容位于 `query`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "queryType", content = "query")]
pub enum QueryBody {
    MeasurementQuery(MeasurementQuery),
    AssetMeasurementQuery(AssetMeasurementQuery),
    EventQuery(EventQuery),
    RawQuery(RawQuery),
}

impl QueryBody {
    pub fn query_type(&self) -> QueryType {
        match self {
            Self::MeasurementQuery(_) => QueryType::MeasurementQuery,
            Self::AssetMeasurementQuery(_) => QueryType::AssetMeasurementQuery,
            Self::EventQuery(_) => QueryType::EventQuery,
            Self::RawQuery(_) => QueryType::RawQuery,
        }
    }
}

/// 编辑器页签，序列化为 0..=3。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TabIndex {
    #[default]
    Assets,
    Measurements,
    Events,
    RawQuery,
}

impl TabIndex {
    /// 该页签承载的查询类型。
    pub fn query_type(&self) -> QueryType {
        match self {
            Self::Assets => QueryType::AssetMeasurementQuery,
            Self::Measurements => QueryType::MeasurementQuery,
            Self::Events => QueryType::EventQuery,
            Self::RawQuery => QueryType::RawQuery,
        }
    }

    /// 按名称解析（配置项使用）。
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "assets" => Some(Self::Assets),
            "measurements" => Some(Self::Measurements),
            "events" => Some(Self::Events),
            "raw" | "rawquery" => Some(Self::RawQuery),
            _ => None,
        }
    }
}

impl TryFrom<u8> for TabIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Assets),
            1 => Ok(Self::Measurements),
            2 => Ok(Self::Events),
            3 => Ok(Self::RawQuery),
            other => Err(format!("invalid tab index: {other}")),
        }
    }
}

impl From<TabIndex> for u8 {
    fn from(value: TabIndex) -> Self {
        match value {
            TabIndex::Assets => 0,
            TabIndex::Measurements => 1,
            TabIndex::Events => 2,
            TabIndex::RawQuery => 3,
        }
    }
}

/// 宿主持有的查询对象。
///
/// 反序列化时查询体解析失败直接报错，不会退化为无查询体。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "HostQueryWire")]
pub struct HostQuery {
    pub ref_id: String,
    #[serde(flatten)]
    pub body: Option<QueryBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<TabIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,
}

impl HostQuery {
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: QueryBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_type(&self) -> Option<QueryType> {
        self.body.as_ref().map(QueryBody::query_type)
    }

    pub fn event_query(&self) -> Option<&EventQuery> {
        match &self.body {
            Some(QueryBody::EventQuery(query)) => Some(query),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostQueryWire {
    ref_id: String,
    #[serde(default)]
    query_type: Option<QueryType>,
    #[serde(default)]
    query: Option<serde_json::Value>,
    #[serde(default)]
    tab_index: Option<TabIndex>,
    #[serde(default)]
    series_limit: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    hide: bool,
}

impl TryFrom<HostQueryWire> for HostQuery {
    type Error = serde_json::Error;

    fn try_from(wire: HostQueryWire) -> Result<Self, Self::Error> {
        let body = match wire.query_type {
            Some(query_type) => Some(query_type.parse_body(wire.query)?),
            None => None,
        };
        Ok(Self {
            ref_id: wire.ref_id,
            body,
            tab_index: wire.tab_index,
            series_limit: wire.series_limit,
            hide: wire.hide,
        })
    }
}

/// 宿主对未设置的列表字段写入 `null`，按空值处理。
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
