//! 历史库参考数据
//!
//! 每个编辑器会话加载一次，之后只读：
//! - Asset / AssetProperty：资产层级与资产属性
//! - EventType / EventConfiguration / EventTypeProperty：事件类型、资产关联与属性
//! - Measurement / Collector / TimeseriesDatabase：测点与数据库
//! - HistorianInfo：服务端版本（用于功能门控）

use serde::{Deserialize, Deserializer, Serialize};

/// 资产：设备层级树中的节点，`ParentUUID` 为空时为根。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Asset {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "ParentUUID", default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

impl Asset {
    /// 父资产 UUID（空字符串视为根）。
    pub fn parent(&self) -> Option<&str> {
        self.parent_uuid.as_deref().filter(|parent| !parent.is_empty())
    }

    /// 显示路径：优先 `AssetPath`，否则 `Name`。
    pub fn display_path(&self) -> &str {
        match self.asset_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => &self.name,
        }
    }
}

/// 资产属性：资产与测点的绑定。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetProperty {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(rename = "AssetUUID")]
    pub asset_uuid: String,
    #[serde(rename = "MeasurementUUID", default)]
    pub measurement_uuid: String,
}

/// 事件类型，可通过 `ParentUUID` 形成父事件类型层级。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventType {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(rename = "ParentUUID", default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
}

/// 事件配置：资产与事件类型的多对多关联。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventConfiguration {
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "AssetUUID")]
    pub asset_uuid: String,
    #[serde(rename = "EventTypeUUID")]
    pub event_type_uuid: String,
}

/// 事件属性的数据类型。未知或缺失的类型按数值处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PropertyDatatype {
    #[default]
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "string")]
    String,
}

impl PropertyDatatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::String => "string",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Self::Bool,
            "string" => Self::String,
            _ => Self::Number,
        }
    }
}

impl<'de> Deserialize<'de> for PropertyDatatype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// 事件属性类型：simple 每个事件一个值，periodic 为时序值（可带维度）。
/// 未知类型按 simple 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PropertyType {
    #[default]
    #[serde(rename = "simple")]
    Simple,
    #[serde(rename = "periodic")]
    Periodic,
    #[serde(rename = "periodic-with-dimension")]
    PeriodicWithDimension,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [
        PropertyType::Simple,
        PropertyType::Periodic,
        PropertyType::PeriodicWithDimension,
    ];

    /// 查询类型下拉中显示的名称。
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Periodic => "Periodic",
            Self::PeriodicWithDimension => "PeriodicWithDimension",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Periodic => "periodic",
            Self::PeriodicWithDimension => "periodic-with-dimension",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "periodic" => Self::Periodic,
            "periodic-with-dimension" | "periodic_with_dimension" | "periodicwithdimension" => {
                Self::PeriodicWithDimension
            }
            _ => Self::Simple,
        }
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// 事件类型属性。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventTypeProperty {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(rename = "EventTypeUUID")]
    pub event_type_uuid: String,
    #[serde(default)]
    pub datatype: PropertyDatatype,
    #[serde(rename = "Type", default)]
    pub property_type: PropertyType,
}

/// 采集器。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collector {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub collector_type: String,
}

/// 时序数据库。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeseriesDatabase {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// 测点：绑定到数据库（可选采集器）的时间序列。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub datatype: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "CollectorUUID", default)]
    pub collector_uuid: String,
    #[serde(rename = "DatabaseUUID", default)]
    pub database_uuid: String,
    #[serde(rename = "UoM", default)]
    pub uom: String,
}

/// 历史库服务信息。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorianInfo {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "APIVersion", default)]
    pub api_version: String,
}
