//! 参考数据访问接口
//!
//! 所有方法均为异步且可能失败；核心不做重试，由调用方决定吞掉还是上抛。

use async_trait::async_trait;
use domain::{
    Asset, AssetFilter, AssetProperty, AssetPropertyFilter, Collector, EventConfiguration,
    EventType, EventTypeFilter, EventTypePropertiesFilter, EventTypeProperty, HistorianInfo,
    Measurement, MeasurementFilter, Pagination, TimeseriesDatabase, TimeseriesDatabaseFilter,
};

use crate::error::DataApiError;

#[async_trait]
pub trait DataApi: Send + Sync {
    async fn get_assets(&self, filter: Option<&AssetFilter>) -> Result<Vec<Asset>, DataApiError>;

    async fn get_measurements(
        &self,
        filter: &MeasurementFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Measurement>, DataApiError>;

    async fn get_collectors(&self) -> Result<Vec<Collector>, DataApiError>;

    async fn get_timeseries_databases(
        &self,
        filter: Option<&TimeseriesDatabaseFilter>,
    ) -> Result<Vec<TimeseriesDatabase>, DataApiError>;

    async fn get_asset_properties(
        &self,
        filter: Option<&AssetPropertyFilter>,
    ) -> Result<Vec<AssetProperty>, DataApiError>;

    async fn get_event_types(
        &self,
        filter: Option<&EventTypeFilter>,
    ) -> Result<Vec<EventType>, DataApiError>;

    async fn get_event_type_properties(
        &self,
        filter: Option<&EventTypePropertiesFilter>,
    ) -> Result<Vec<EventTypeProperty>, DataApiError>;

    async fn get_event_configurations(&self) -> Result<Vec<EventConfiguration>, DataApiError>;

    async fn get_info(&self) -> Result<HistorianInfo, DataApiError>;
}
