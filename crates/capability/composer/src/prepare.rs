//! 执行前的查询准备
//!
//! 展开模板变量，丢弃未填写的过滤条件，并按数据类型还原事件属性过滤值。
//! 隐藏的查询与没有查询体的查询不会发出。

use std::collections::BTreeMap;
use std::sync::OnceLock;

use domain::{
    AssetMeasurementQuery, Condition, EventPropertyFilter, EventQuery, HostQuery,
    MeasurementQuery, MeasurementQueryOptions, Operator, PropertyDatatype, PropertyType,
    QueryBody, RawQuery, ValueFilter,
};
use historian_template::{ScopedVars, TemplateContext};
use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};

/// 值过滤条件的占位值，执行前丢弃。
pub const VALUE_FILTER_PLACEHOLDER: &str = "enter a value";

/// 序列上限缺省值。
pub const DEFAULT_SERIES_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedQuery {
    pub ref_id: String,
    #[serde(flatten)]
    pub body: PreparedBody,
    pub series_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", content = "query")]
pub enum PreparedBody {
    MeasurementQuery(MeasurementQuery),
    AssetMeasurementQuery(AssetMeasurementQuery),
    EventQuery(PreparedEventQuery),
    RawQuery(RawQuery),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreparedEventQuery {
    #[serde(rename = "Type")]
    pub property_type: PropertyType,
    pub assets: Vec<String>,
    pub event_types: Vec<String>,
    pub statuses: Vec<String>,
    pub properties: Vec<String>,
    pub property_filter: Vec<PreparedPropertyFilter>,
    pub include_parent_info: bool,
    pub query_asset_properties: bool,
    pub override_assets: Vec<String>,
    pub asset_properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MeasurementQueryOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// 执行形式的属性过滤条件：`Value` 为数值、布尔、字符串或字符串列表。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreparedPropertyFilter {
    pub property: String,
    pub datatype: PropertyDatatype,
    pub condition: Condition,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub parent: bool,
}

/// 准备一批查询；`default_series_limit` 用于未设置（或为 0）的序列上限。
pub fn prepare_queries(
    targets: &[HostQuery],
    template: &TemplateContext,
    scoped: &ScopedVars,
    default_series_limit: u32,
) -> Vec<PreparedQuery> {
    targets
        .iter()
        .filter_map(|target| prepare_query(target, template, scoped, default_series_limit))
        .collect()
}

pub fn prepare_query(
    target: &HostQuery,
    template: &TemplateContext,
    scoped: &ScopedVars,
    default_series_limit: u32,
) -> Option<PreparedQuery> {
    if target.hide {
        return None;
    }
    let expander = Expander { template, scoped };
    let body = match target.body.as_ref()? {
        QueryBody::AssetMeasurementQuery(query) => {
            let mut options = expander.options(&query.options);
            drop_placeholder_filters(&mut options.value_filters);
            PreparedBody::AssetMeasurementQuery(AssetMeasurementQuery {
                assets: expander.expand_all(&query.assets),
                asset_properties: expander.expand_all(&query.asset_properties),
                options,
            })
        }
        QueryBody::MeasurementQuery(query) => {
            let mut options = expander.options(&query.options);
            drop_placeholder_filters(&mut options.value_filters);
            PreparedBody::MeasurementQuery(MeasurementQuery {
                databases: expander.expand_all(&query.databases),
                measurements: expander.expand_all(&query.measurements),
                options,
                ..query.clone()
            })
        }
        QueryBody::RawQuery(query) => PreparedBody::RawQuery(RawQuery {
            timeseries_database: expander.replace(&query.timeseries_database),
            query: expander.replace(&query.query),
        }),
        QueryBody::EventQuery(query) => PreparedBody::EventQuery(expander.event(query)),
    };
    let series_limit = target
        .series_limit
        .filter(|limit| *limit > 0)
        .unwrap_or(default_series_limit);
    Some(PreparedQuery {
        ref_id: target.ref_id.clone(),
        body,
        series_limit,
    })
}

fn drop_placeholder_filters(filters: &mut Vec<ValueFilter>) {
    filters.retain(|filter| filter.value != VALUE_FILTER_PLACEHOLDER);
}

struct Expander<'a> {
    template: &'a TemplateContext,
    scoped: &'a ScopedVars,
}

impl Expander<'_> {
    fn replace(&self, value: &str) -> String {
        self.template.replace(value, self.scoped)
    }

    fn expand(&self, value: &str) -> Vec<String> {
        self.template.multi_select_replace(value, self.scoped)
    }

    fn expand_all(&self, values: &[String]) -> Vec<String> {
        self.template.expand_all(values, self.scoped)
    }

    fn options(&self, options: &MeasurementQueryOptions) -> MeasurementQueryOptions {
        let tags: BTreeMap<String, String> = options
            .tags
            .iter()
            .map(|(key, value)| (self.replace(key), self.replace(value)))
            .collect();
        let value_filters = options
            .value_filters
            .iter()
            .map(|filter| ValueFilter {
                value: self.replace(&filter.value),
                ..filter.clone()
            })
            .collect();
        let aggregation = options.aggregation.as_ref().map(|aggregation| {
            let mut aggregation = aggregation.clone();
            aggregation.name = self.replace(&aggregation.name);
            aggregation.period = aggregation.period.as_deref().map(|period| self.replace(period));
            aggregation.arguments = aggregation
                .arguments
                .iter()
                .map(|argument| self.replace(argument))
                .collect();
            aggregation
        });
        MeasurementQueryOptions {
            tags,
            group_by: self.expand_all(&options.group_by),
            value_filters,
            aggregation,
            ..options.clone()
        }
    }

    fn event(&self, query: &EventQuery) -> PreparedEventQuery {
        let mut options = query.options.clone();
        if query.query_asset_properties {
            if let Some(options) = options.as_mut() {
                drop_placeholder_filters(&mut options.value_filters);
            }
        }
        PreparedEventQuery {
            property_type: query.property_type,
            assets: self.expand_all(&query.assets),
            event_types: self.expand_all(&query.event_types),
            statuses: self.expand_all(&query.statuses),
            properties: self.expand_all(&query.properties),
            property_filter: query
                .property_filter
                .iter()
                .filter(|filter| is_complete(filter))
                .map(|filter| self.property_filter(filter))
                .collect(),
            include_parent_info: query.include_parent_info,
            query_asset_properties: query.query_asset_properties,
            override_assets: query.override_assets.clone(),
            asset_properties: query.asset_properties.clone(),
            options,
            limit: query.limit,
        }
    }

    fn property_filter(&self, filter: &EventPropertyFilter) -> PreparedPropertyFilter {
        let raw = filter.value.clone().unwrap_or_default();
        let value = if !filter.operator.needs_value() {
            filter.value.clone().map(Value::String)
        } else if filter.operator.is_list() {
            let values = self.expand(&raw);
            if values.is_empty() {
                Some(Value::String(raw))
            } else {
                Some(Value::Array(values.into_iter().map(Value::String).collect()))
            }
        } else {
            let replaced = self.replace(&raw);
            Some(match filter.datatype {
                PropertyDatatype::Number => parse_float(&replaced)
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                PropertyDatatype::Bool => Value::Bool(replaced == "true"),
                PropertyDatatype::String => Value::String(replaced),
            })
        };
        PreparedPropertyFilter {
            property: self.replace(&filter.property),
            datatype: filter.datatype,
            condition: filter.condition,
            operator: filter.operator.clone(),
            value,
            parent: filter.parent,
        }
    }
}

/// 无值运算符总是保留；其余需要非空值。
fn is_complete(filter: &EventPropertyFilter) -> bool {
    !filter.operator.needs_value() || filter.value.as_deref().is_some_and(|value| !value.is_empty())
}

static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();

fn float_prefix() -> &'static Regex {
    FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("Valid regex pattern")
    })
}

/// 取最长的数值前缀（如 `"12.5kg"` → 12.5）；没有数值前缀时为 `None`。
pub fn parse_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let prefix = float_prefix().find(text)?.as_str();
    match prefix.trim_start_matches(['+', '-']) {
        "Infinity" if prefix.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => prefix.parse().ok(),
    }
}
