//! 参考数据查询过滤器与分页
//!
//! 过滤器在编辑期已完成模板展开；`query_pairs` 产出资源接口的查询参数，
//! 列表字段按重复键展开（`AssetUUIDs=a&AssetUUIDs=b`）。

use serde::{Deserialize, Serialize};

fn push_opt(pairs: &mut Vec<(String, String)>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.clone()));
    }
}

fn push_list(pairs: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    for value in values {
        pairs.push((key.to_string(), value.clone()));
    }
}

fn push_flag(pairs: &mut Vec<(String, String)>, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
}

/// 资产过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "ParentUUIDs", skip_serializing_if = "Option::is_none")]
    pub parent_uuids: Option<Vec<String>>,
}

impl AssetFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        push_opt(&mut pairs, "Path", &self.path);
        if let Some(parents) = &self.parent_uuids {
            push_list(&mut pairs, "ParentUUIDs", parents);
        }
        pairs
    }
}

/// 测点过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MeasurementFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "DatabaseUUIDs")]
    pub database_uuids: Vec<String>,
    #[serde(rename = "CollectorUUIDs")]
    pub collector_uuids: Vec<String>,
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_bad_quality_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_calculations: Option<bool>,
}

impl MeasurementFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        push_list(&mut pairs, "DatabaseUUIDs", &self.database_uuids);
        push_list(&mut pairs, "CollectorUUIDs", &self.collector_uuids);
        push_list(&mut pairs, "Statuses", &self.statuses);
        push_flag(&mut pairs, "WithBadQualityOnly", self.with_bad_quality_only);
        push_flag(&mut pairs, "ExcludeCalculations", self.exclude_calculations);
        pairs
    }
}

/// 事件类型过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventTypeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl EventTypeFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        pairs
    }
}

/// 事件类型属性过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventTypePropertiesFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "EventTypeUUIDs")]
    pub event_type_uuids: Vec<String>,
    pub types: Vec<String>,
}

impl EventTypePropertiesFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        push_list(&mut pairs, "EventTypeUUIDs", &self.event_type_uuids);
        push_list(&mut pairs, "Types", &self.types);
        pairs
    }
}

/// 资产属性过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssetPropertyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "AssetUUIDs")]
    pub asset_uuids: Vec<String>,
}

impl AssetPropertyFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        push_list(&mut pairs, "AssetUUIDs", &self.asset_uuids);
        pairs
    }
}

/// 时序数据库过滤器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimeseriesDatabaseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl TimeseriesDatabaseFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "Keyword", &self.keyword);
        pairs
    }
}

/// 分页参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pagination {
    pub limit: u32,
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: 100, page: 1 }
    }
}

impl Pagination {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.limit > 0 {
            pairs.push(("limit".to_string(), self.limit.to_string()));
        }
        if self.page > 0 {
            pairs.push(("page".to_string(), self.page.to_string()));
        }
        pairs
    }
}
