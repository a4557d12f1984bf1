//! 模板变量查询：按 `type` 区分过滤器，结果为 `{text, value}` 列表。

use serde::{Deserialize, Serialize};

use crate::filter::{
    AssetFilter, AssetPropertyFilter, EventTypeFilter, EventTypePropertiesFilter,
    MeasurementFilter, TimeseriesDatabaseFilter,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "filter")]
pub enum VariableQuery {
    MeasurementQuery(#[serde(default)] MeasurementFilter),
    AssetQuery(#[serde(default)] AssetFilter),
    EventTypeQuery(#[serde(default)] EventTypeFilter),
    DatabaseQuery(#[serde(default)] TimeseriesDatabaseFilter),
    EventTypePropertyQuery(#[serde(default)] EventTypePropertiesFilter),
    AssetPropertyQuery(#[serde(default)] AssetPropertyFilter),
}

/// 变量编辑器中可选的查询类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableQueryType {
    MeasurementQuery,
    AssetQuery,
    EventTypeQuery,
    DatabaseQuery,
    EventTypePropertyQuery,
    AssetPropertyQuery,
}

impl VariableQueryType {
    pub const ALL: [VariableQueryType; 6] = [
        VariableQueryType::MeasurementQuery,
        VariableQueryType::AssetQuery,
        VariableQueryType::EventTypeQuery,
        VariableQueryType::DatabaseQuery,
        VariableQueryType::EventTypePropertyQuery,
        VariableQueryType::AssetPropertyQuery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MeasurementQuery => "Measurement",
            Self::AssetQuery => "Asset",
            Self::EventTypeQuery => "Event type",
            Self::DatabaseQuery => "Database",
            Self::EventTypePropertyQuery => "Event type property",
            Self::AssetPropertyQuery => "Asset property",
        }
    }

    /// 空过滤器的变量查询。
    pub fn empty_query(&self) -> VariableQuery {
        match self {
            Self::MeasurementQuery => VariableQuery::MeasurementQuery(MeasurementFilter::default()),
            Self::AssetQuery => VariableQuery::AssetQuery(AssetFilter::default()),
            Self::EventTypeQuery => VariableQuery::EventTypeQuery(EventTypeFilter::default()),
            Self::DatabaseQuery => VariableQuery::DatabaseQuery(TimeseriesDatabaseFilter::default()),
            Self::EventTypePropertyQuery => {
                VariableQuery::EventTypePropertyQuery(EventTypePropertiesFilter::default())
            }
            Self::AssetPropertyQuery => {
                VariableQuery::AssetPropertyQuery(AssetPropertyFilter::default())
            }
        }
    }
}

impl VariableQuery {
    pub fn query_type(&self) -> VariableQueryType {
        match self {
            Self::MeasurementQuery(_) => VariableQueryType::MeasurementQuery,
            Self::AssetQuery(_) => VariableQueryType::AssetQuery,
            Self::EventTypeQuery(_) => VariableQueryType::EventTypeQuery,
            Self::DatabaseQuery(_) => VariableQueryType::DatabaseQuery,
            Self::EventTypePropertyQuery(_) => VariableQueryType::EventTypePropertyQuery,
            Self::AssetPropertyQuery(_) => VariableQueryType::AssetPropertyQuery,
        }
    }
}

/// 变量取值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFindValue {
    pub text: String,
    pub value: String,
}
