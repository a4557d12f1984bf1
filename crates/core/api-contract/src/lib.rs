//! 稳定的 DTO 与 API 响应契约。

use std::collections::BTreeMap;

use domain::{
    CascaderOption, EventPropertyFilter, EventQuery, FieldUpdate, HostQuery, QueryTag,
    VariableQuery,
};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 宿主声明的模板变量及其当前值。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariableDto {
    pub name: String,
    #[serde(default)]
    pub current: Vec<String>,
}

/// 参考数据加载状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceStatusDto {
    pub session_id: String,
    pub loading: bool,
    pub version: String,
    pub api_version: String,
    pub assets: usize,
    pub asset_properties: usize,
    pub event_types: usize,
    pub event_type_properties: usize,
    pub event_configurations: usize,
}

/// 编辑器计数器快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub reference_fetches: u64,
    pub reference_fetch_failures: u64,
    pub query_changes: u64,
    pub runs_requested: u64,
    pub runs_suppressed: u64,
    pub debounced_flushes: u64,
    pub invalid_regex_inputs: u64,
}

/// 事件编辑器选项请求。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventOptionsRequest {
    pub query: EventQuery,
    /// 正在编辑取值的 WHERE 标签键。
    pub value_key: Option<String>,
    pub annotation: bool,
    pub variables: Vec<TemplateVariableDto>,
}

/// 资产级联树请求；`search` 非空时同时返回扁平化的搜索建议。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetTreeRequest {
    pub with_properties: bool,
    pub selector: Option<String>,
    pub search: Option<String>,
    pub separator: Option<String>,
    pub variables: Vec<TemplateVariableDto>,
}

/// 搜索模式下的一条建议。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMatchDto {
    pub label: String,
    pub asset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTreeResponse {
    pub loading: bool,
    pub tree: Vec<CascaderOption>,
    pub label: String,
    pub matches: Vec<AssetMatchDto>,
}

/// 字段更新请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReduceRequest {
    pub query: HostQuery,
    pub update: FieldUpdate,
    #[serde(default)]
    pub annotation: bool,
    #[serde(default)]
    pub variables: Vec<TemplateVariableDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReduceResponse {
    pub query: HostQuery,
    pub runnable: bool,
    /// 注解编辑器在合并后自动请求了执行。
    pub run_requested: bool,
}

/// WHERE 标签行编辑动作。
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TagEdit {
    Push { key: String },
    Remove { index: usize },
    Set { index: usize, tag: QueryTag },
    EditValue { index: usize, value: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEditRequest {
    #[serde(default)]
    pub tags: Vec<QueryTag>,
    pub edit: TagEdit,
}

/// 标签行与结构化条件互转；给出 `tags` 时按 `eventTypes` 解析数据类型。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConversionRequest {
    pub filters: Option<Vec<EventPropertyFilter>>,
    pub tags: Option<Vec<QueryTag>>,
    pub event_types: Vec<String>,
    pub variables: Vec<TemplateVariableDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConversionResponse {
    pub tags: Vec<QueryTag>,
    pub filters: Vec<EventPropertyFilter>,
}

/// 执行前准备请求。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrepareRequest {
    pub targets: Vec<HostQuery>,
    pub variables: Vec<TemplateVariableDto>,
    pub scoped_vars: BTreeMap<String, Vec<String>>,
}

/// 模板变量取值请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableQueryRequest {
    pub query: VariableQuery,
    #[serde(default)]
    pub variables: Vec<TemplateVariableDto>,
    #[serde(default)]
    pub scoped_vars: BTreeMap<String, Vec<String>>,
}
