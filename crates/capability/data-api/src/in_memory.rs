//! 参考数据内存实现
//!
//! 仅用于本地测试和演示；过滤语义与历史库资源接口保持一致：
//! - `Keyword`：`/regex/` 形式按正则匹配名称，否则按名称子串（不区分大小写）
//! - `Path`：`/regex/` 形式整串匹配显示路径，否则精确匹配
//! - 列表过滤为空时不生效

use std::sync::RwLock;

use async_trait::async_trait;
use domain::{
    Asset, AssetFilter, AssetProperty, AssetPropertyFilter, Collector, EventConfiguration,
    EventType, EventTypeFilter, EventTypePropertiesFilter, EventTypeProperty, HistorianInfo,
    Measurement, MeasurementFilter, Pagination, TimeseriesDatabase, TimeseriesDatabaseFilter,
};
use historian_filter::{compile_selector, is_regex, regex_body};
use regex::Regex;

use crate::error::DataApiError;
use crate::guard::rejects_pattern;
use crate::traits::DataApi;

/// 内存参考数据快照。
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub assets: Vec<Asset>,
    pub asset_properties: Vec<AssetProperty>,
    pub measurements: Vec<Measurement>,
    pub collectors: Vec<Collector>,
    pub databases: Vec<TimeseriesDatabase>,
    pub event_types: Vec<EventType>,
    pub event_type_properties: Vec<EventTypeProperty>,
    pub event_configurations: Vec<EventConfiguration>,
    pub info: HistorianInfo,
}

/// 参考数据内存存储
pub struct InMemoryDataApi {
    data: RwLock<ReferenceData>,
    unavailable: RwLock<Option<String>>,
}

impl InMemoryDataApi {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            data: RwLock::new(data),
            unavailable: RwLock::new(None),
        }
    }

    /// 整体替换参考数据。
    pub fn replace(&self, data: ReferenceData) -> Result<(), DataApiError> {
        let mut guard = self.data.write().map_err(|_| lock_failed())?;
        *guard = data;
        Ok(())
    }

    /// 模拟服务不可用：之后的每次调用都返回 `Unavailable`，传入 `None` 恢复。
    pub fn set_unavailable(&self, reason: Option<String>) -> Result<(), DataApiError> {
        let mut guard = self.unavailable.write().map_err(|_| lock_failed())?;
        *guard = reason;
        Ok(())
    }

    fn read<T>(&self, select: impl FnOnce(&ReferenceData) -> T) -> Result<T, DataApiError> {
        let unavailable = self.unavailable.read().map_err(|_| lock_failed())?;
        if let Some(reason) = unavailable.as_ref() {
            return Err(DataApiError::Unavailable(reason.clone()));
        }
        let data = self.data.read().map_err(|_| lock_failed())?;
        Ok(select(&data))
    }
}

impl Default for InMemoryDataApi {
    fn default() -> Self {
        Self::new(ReferenceData::default())
    }
}

fn lock_failed() -> DataApiError {
    DataApiError::Unavailable("lock failed".to_string())
}

/// 关键字匹配器；非法正则在调用前已被拦截。
enum Keyword {
    Any,
    Pattern(Regex),
    Text(String),
}

impl Keyword {
    fn new(keyword: Option<&str>) -> Self {
        match keyword {
            None | Some("") => Self::Any,
            Some(value) if is_regex(value) => match regex_body(value).map(Regex::new) {
                Some(Ok(regex)) => Self::Pattern(regex),
                _ => Self::Any,
            },
            Some(value) => Self::Text(value.to_lowercase()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(regex) => regex.is_match(name),
            Self::Text(text) => name.to_lowercase().contains(text),
        }
    }
}

fn in_list(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|item| item == value)
}

#[async_trait]
impl DataApi for InMemoryDataApi {
    async fn get_assets(&self, filter: Option<&AssetFilter>) -> Result<Vec<Asset>, DataApiError> {
        let Some(filter) = filter else {
            return self.read(|data| data.assets.clone());
        };
        if filter
            .parent_uuids
            .as_ref()
            .is_some_and(|parents| parents.is_empty() || parents.iter().any(String::is_empty))
        {
            return Ok(Vec::new());
        }
        if rejects_pattern(filter.keyword.as_deref()) || rejects_pattern(filter.path.as_deref()) {
            return Ok(Vec::new());
        }

        let keyword = Keyword::new(filter.keyword.as_deref());
        let path = filter.path.as_deref().filter(|path| !path.is_empty());
        let path_regex = path.and_then(compile_selector);
        self.read(|data| {
            data.assets
                .iter()
                .filter(|asset| keyword.matches(&asset.name))
                .filter(|asset| match (path, &path_regex) {
                    (None, _) => true,
                    (Some(_), Some(regex)) => regex.is_match(asset.display_path()),
                    (Some(path), None) => asset.display_path() == path,
                })
                .filter(|asset| match &filter.parent_uuids {
                    Some(parents) => asset
                        .parent()
                        .is_some_and(|parent| parents.iter().any(|p| p == parent)),
                    None => true,
                })
                .cloned()
                .collect()
        })
    }

    async fn get_measurements(
        &self,
        filter: &MeasurementFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Measurement>, DataApiError> {
        if rejects_pattern(filter.keyword.as_deref()) {
            return Ok(Vec::new());
        }
        let keyword = Keyword::new(filter.keyword.as_deref());
        let matched: Vec<Measurement> = self.read(|data| {
            data.measurements
                .iter()
                .filter(|m| keyword.matches(&m.name))
                .filter(|m| in_list(&filter.database_uuids, &m.database_uuid))
                .filter(|m| in_list(&filter.collector_uuids, &m.collector_uuid))
                .filter(|m| in_list(&filter.statuses, &m.status))
                .cloned()
                .collect()
        })?;

        if pagination.limit == 0 {
            return Ok(matched);
        }
        let limit = pagination.limit as usize;
        let page = pagination.page.max(1) as usize;
        Ok(matched
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect())
    }

    async fn get_collectors(&self) -> Result<Vec<Collector>, DataApiError> {
        self.read(|data| data.collectors.clone())
    }

    async fn get_timeseries_databases(
        &self,
        filter: Option<&TimeseriesDatabaseFilter>,
    ) -> Result<Vec<TimeseriesDatabase>, DataApiError> {
        let keyword = filter.and_then(|filter| filter.keyword.as_deref());
        if rejects_pattern(keyword) {
            return Ok(Vec::new());
        }
        let keyword = Keyword::new(keyword);
        self.read(|data| {
            data.databases
                .iter()
                .filter(|db| keyword.matches(&db.name))
                .cloned()
                .collect()
        })
    }

    async fn get_asset_properties(
        &self,
        filter: Option<&AssetPropertyFilter>,
    ) -> Result<Vec<AssetProperty>, DataApiError> {
        let keyword = Keyword::new(filter.and_then(|filter| filter.keyword.as_deref()));
        let assets = filter.map(|filter| filter.asset_uuids.as_slice()).unwrap_or_default();
        self.read(|data| {
            data.asset_properties
                .iter()
                .filter(|p| keyword.matches(&p.name))
                .filter(|p| in_list(assets, &p.asset_uuid))
                .cloned()
                .collect()
        })
    }

    async fn get_event_types(
        &self,
        filter: Option<&EventTypeFilter>,
    ) -> Result<Vec<EventType>, DataApiError> {
        let keyword = filter.and_then(|filter| filter.keyword.as_deref());
        if rejects_pattern(keyword) {
            return Ok(Vec::new());
        }
        let keyword = Keyword::new(keyword);
        self.read(|data| {
            data.event_types
                .iter()
                .filter(|et| keyword.matches(&et.name))
                .cloned()
                .collect()
        })
    }

    async fn get_event_type_properties(
        &self,
        filter: Option<&EventTypePropertiesFilter>,
    ) -> Result<Vec<EventTypeProperty>, DataApiError> {
        let keyword = Keyword::new(filter.and_then(|filter| filter.keyword.as_deref()));
        let event_types = filter
            .map(|filter| filter.event_type_uuids.as_slice())
            .unwrap_or_default();
        let types = filter.map(|filter| filter.types.as_slice()).unwrap_or_default();
        self.read(|data| {
            data.event_type_properties
                .iter()
                .filter(|p| keyword.matches(&p.name))
                .filter(|p| in_list(event_types, &p.event_type_uuid))
                .filter(|p| in_list(types, p.property_type.as_str()))
                .cloned()
                .collect()
        })
    }

    async fn get_event_configurations(&self) -> Result<Vec<EventConfiguration>, DataApiError> {
        self.read(|data| data.event_configurations.clone())
    }

    async fn get_info(&self) -> Result<HistorianInfo, DataApiError> {
        self.read(|data| data.info.clone())
    }
}
