//! 历史库资源接口客户端
//!
//! 资源路径：`assets`、`measurements`、`collectors`、`databases`、`asset-properties`、
//! `event-types`、`event-type-properties`、`event-configurations`、`info`。

use std::time::Duration;

use async_trait::async_trait;
use domain::{
    Asset, AssetFilter, AssetProperty, AssetPropertyFilter, Collector, EventConfiguration,
    EventType, EventTypeFilter, EventTypePropertiesFilter, EventTypeProperty, HistorianInfo,
    Measurement, MeasurementFilter, Pagination, TimeseriesDatabase, TimeseriesDatabaseFilter,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::DataApiError;
use crate::guard::rejects_pattern;
use crate::traits::DataApi;

#[derive(Debug, Clone)]
pub struct HttpDataApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDataApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DataApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, DataApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, params = params.len(), "historian resource request");

        let mut request = self.client.get(&url).query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| DataApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl DataApi for HttpDataApi {
    async fn get_assets(&self, filter: Option<&AssetFilter>) -> Result<Vec<Asset>, DataApiError> {
        let Some(filter) = filter else {
            return self.get_resource("assets", &[]).await;
        };
        if filter
            .parent_uuids
            .as_ref()
            .is_some_and(|parents| parents.is_empty() || parents.iter().any(String::is_empty))
        {
            // 未选择父资产
            return Ok(Vec::new());
        }
        if rejects_pattern(filter.keyword.as_deref()) || rejects_pattern(filter.path.as_deref()) {
            return Ok(Vec::new());
        }
        self.get_resource("assets", &filter.query_pairs()).await
    }

    async fn get_measurements(
        &self,
        filter: &MeasurementFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Measurement>, DataApiError> {
        if rejects_pattern(filter.keyword.as_deref()) {
            return Ok(Vec::new());
        }
        let mut params = filter.query_pairs();
        params.extend(pagination.query_pairs());
        self.get_resource("measurements", &params).await
    }

    async fn get_collectors(&self) -> Result<Vec<Collector>, DataApiError> {
        self.get_resource("collectors", &[]).await
    }

    async fn get_timeseries_databases(
        &self,
        filter: Option<&TimeseriesDatabaseFilter>,
    ) -> Result<Vec<TimeseriesDatabase>, DataApiError> {
        if filter.is_some_and(|filter| rejects_pattern(filter.keyword.as_deref())) {
            return Ok(Vec::new());
        }
        let params = filter
            .map(TimeseriesDatabaseFilter::query_pairs)
            .unwrap_or_default();
        self.get_resource("databases", &params).await
    }

    async fn get_asset_properties(
        &self,
        filter: Option<&AssetPropertyFilter>,
    ) -> Result<Vec<AssetProperty>, DataApiError> {
        let params = filter.map(AssetPropertyFilter::query_pairs).unwrap_or_default();
        self.get_resource("asset-properties", &params).await
    }

    async fn get_event_types(
        &self,
        filter: Option<&EventTypeFilter>,
    ) -> Result<Vec<EventType>, DataApiError> {
        if filter.is_some_and(|filter| rejects_pattern(filter.keyword.as_deref())) {
            return Ok(Vec::new());
        }
        let params = filter.map(EventTypeFilter::query_pairs).unwrap_or_default();
        self.get_resource("event-types", &params).await
    }

    async fn get_event_type_properties(
        &self,
        filter: Option<&EventTypePropertiesFilter>,
    ) -> Result<Vec<EventTypeProperty>, DataApiError> {
        let params = filter
            .map(EventTypePropertiesFilter::query_pairs)
            .unwrap_or_default();
        self.get_resource("event-type-properties", &params).await
    }

    async fn get_event_configurations(&self) -> Result<Vec<EventConfiguration>, DataApiError> {
        self.get_resource("event-configurations", &[]).await
    }

    async fn get_info(&self) -> Result<HistorianInfo, DataApiError> {
        self.get_resource("info", &[]).await
    }
}
