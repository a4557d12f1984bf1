//! 参考数据快照与加载状态

use std::sync::Arc;

use domain::{
    Asset, AssetProperty, EventConfiguration, EventType, EventTypeProperty, HistorianInfo,
};
use historian_filter::{DEFAULT_DURATION_FILTER_VERSION, DEFAULT_EXTENDED_OPERATORS_VERSION};
use serde::{Deserialize, Serialize};

/// 一次编辑器会话加载的只读参考数据。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceSnapshot {
    pub assets: Vec<Asset>,
    pub asset_properties: Vec<AssetProperty>,
    pub event_types: Vec<EventType>,
    pub event_type_properties: Vec<EventTypeProperty>,
    pub event_configurations: Vec<EventConfiguration>,
    pub info: HistorianInfo,
}

impl ReferenceSnapshot {
    pub fn asset(&self, uuid: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.uuid == uuid)
    }

    pub fn event_type(&self, uuid: &str) -> Option<&EventType> {
        self.event_types.iter().find(|event_type| event_type.uuid == uuid)
    }
}

/// 参考数据加载状态；`Loading` 期间所有依赖选项为空。
#[derive(Debug, Clone, Default)]
pub enum ReferenceState {
    #[default]
    Loading,
    Ready(Arc<ReferenceSnapshot>),
}

impl ReferenceState {
    pub fn ready(snapshot: ReferenceSnapshot) -> Self {
        Self::Ready(Arc::new(snapshot))
    }

    pub fn snapshot(&self) -> Option<&ReferenceSnapshot> {
        match self {
            Self::Loading => None,
            Self::Ready(snapshot) => Some(snapshot),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// 服务端版本（未加载时为空串）。
    pub fn version(&self) -> &str {
        self.snapshot()
            .map(|snapshot| snapshot.info.version.as_str())
            .unwrap_or_default()
    }
}

/// 版本门控阈值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub extended_operators_version: String,
    pub duration_filter_version: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            extended_operators_version: DEFAULT_EXTENDED_OPERATORS_VERSION.to_string(),
            duration_filter_version: DEFAULT_DURATION_FILTER_VERSION.to_string(),
        }
    }
}
