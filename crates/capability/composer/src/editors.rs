//! 注解编辑器、变量编辑器与变量取值

use std::sync::Arc;

use domain::{
    AssetFilter, AssetPropertyFilter, EventTypePropertiesFilter, EventUpdate, FieldUpdate,
    HostQuery, MeasurementFilter, MetricFindValue, Pagination, PropertyType, SelectOption,
    VariableQuery, VariableQueryType,
};
use historian_data_api::DataApi;
use historian_options::{EventSelection, OptionResolver};
use historian_template::{ScopedVars, TemplateContext};
use tracing::debug;

use crate::error::ComposerError;
use crate::host::{EditorKind, QueryComposer, QueryHost};
use crate::settings::ComposerSettings;

/// 注解编辑器：simple 事件查询，每次变更后尝试执行。
pub struct AnnotationEditor<H> {
    composer: QueryComposer<H>,
}

impl<H: QueryHost> AnnotationEditor<H> {
    pub fn new(host: H, settings: ComposerSettings) -> Self {
        Self {
            composer: QueryComposer::new(host, EditorKind::Annotation, settings),
        }
    }

    /// 宿主没有查询体时写入空的 simple 事件查询。
    pub fn initialize(&mut self) -> HostQuery {
        self.composer.initialize()
    }

    pub fn apply(
        &mut self,
        update: EventUpdate,
        resolver: &OptionResolver<'_>,
    ) -> Result<HostQuery, ComposerError> {
        let update = match update {
            EventUpdate::PropertyType(_) => EventUpdate::PropertyType(PropertyType::Simple),
            other => other,
        };
        self.composer.apply(FieldUpdate::Event(update), resolver)
    }

    /// 驱动选项依赖图的选择（只允许 simple 属性）。
    pub fn selection(&self, version: &str) -> EventSelection {
        let query = self.composer.host().query();
        let mut selection = query
            .event_query()
            .map(|query| EventSelection::from_query(query, version))
            .unwrap_or_default();
        selection.version = version.to_string();
        selection.property_type = PropertyType::Simple;
        selection.annotation = true;
        selection
    }

    pub fn composer(&self) -> &QueryComposer<H> {
        &self.composer
    }

    pub fn into_host(self) -> H {
        self.composer.into_host()
    }
}

/// 变量编辑器状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEditor {
    query: VariableQuery,
}

impl Default for VariableEditor {
    fn default() -> Self {
        Self {
            query: VariableQueryType::MeasurementQuery.empty_query(),
        }
    }
}

impl VariableEditor {
    pub fn new(query: Option<VariableQuery>) -> Self {
        query.map(|query| Self { query }).unwrap_or_default()
    }

    pub fn query(&self) -> &VariableQuery {
        &self.query
    }

    pub fn type_options() -> Vec<SelectOption> {
        VariableQueryType::ALL
            .into_iter()
            .map(|query_type| SelectOption::new(query_type.label(), format!("{query_type:?}")))
            .collect()
    }

    /// 切换查询类型时过滤器重置为空。
    pub fn set_type(&mut self, query_type: VariableQueryType) -> &VariableQuery {
        if self.query.query_type() != query_type {
            self.query = query_type.empty_query();
        }
        &self.query
    }

    /// 过滤器编辑：整体替换当前查询。
    pub fn set_query(&mut self, query: VariableQuery) -> &VariableQuery {
        self.query = query;
        &self.query
    }
}

/// 变量查询 → `{text, value}` 列表。
pub struct VariableSupport {
    api: Arc<dyn DataApi>,
    template: TemplateContext,
}

impl VariableSupport {
    pub fn new(api: Arc<dyn DataApi>, template: TemplateContext) -> Self {
        Self { api, template }
    }

    pub async fn query(
        &self,
        query: &VariableQuery,
        scoped: &ScopedVars,
    ) -> Result<Vec<MetricFindValue>, ComposerError> {
        debug!(query_type = ?query.query_type(), "variable query");
        let values = match query {
            VariableQuery::MeasurementQuery(filter) => {
                let filter = MeasurementFilter {
                    keyword: filter
                        .keyword
                        .as_deref()
                        .map(|keyword| self.template.replace(keyword, scoped)),
                    database_uuids: self.template.expand_all(&filter.database_uuids, scoped),
                    ..filter.clone()
                };
                let pagination = Pagination { limit: 0, page: 0 };
                self.api
                    .get_measurements(&filter, &pagination)
                    .await?
                    .into_iter()
                    .map(|measurement| find_value(measurement.name, measurement.uuid))
                    .collect()
            }
            VariableQuery::AssetQuery(filter) => {
                let filter = AssetFilter {
                    keyword: filter
                        .keyword
                        .as_deref()
                        .map(|keyword| self.template.replace(keyword, scoped)),
                    parent_uuids: filter
                        .parent_uuids
                        .as_deref()
                        .map(|parents| self.expand_keeping_empty(parents, scoped)),
                    ..filter.clone()
                };
                self.api
                    .get_assets(Some(&filter))
                    .await?
                    .into_iter()
                    .map(|asset| find_value(asset.display_path().to_string(), asset.uuid))
                    .collect()
            }
            VariableQuery::EventTypeQuery(filter) => self
                .api
                .get_event_types(Some(filter))
                .await?
                .into_iter()
                .map(|event_type| find_value(event_type.name, event_type.uuid))
                .collect(),
            VariableQuery::DatabaseQuery(filter) => self
                .api
                .get_timeseries_databases(Some(filter))
                .await?
                .into_iter()
                .map(|database| find_value(database.name, database.uuid))
                .collect(),
            VariableQuery::EventTypePropertyQuery(filter) => {
                let filter = EventTypePropertiesFilter {
                    event_type_uuids: self.template.expand_all(&filter.event_type_uuids, scoped),
                    ..filter.clone()
                };
                let (event_types, properties) = tokio::try_join!(
                    self.api.get_event_types(None),
                    self.api.get_event_type_properties(Some(&filter)),
                )?;
                properties
                    .into_iter()
                    .map(|property| {
                        let text = match event_types
                            .iter()
                            .find(|event_type| event_type.uuid == property.event_type_uuid)
                        {
                            Some(event_type) => format!("{} - {}", event_type.name, property.name),
                            None => property.name,
                        };
                        find_value(text, property.uuid)
                    })
                    .collect()
            }
            VariableQuery::AssetPropertyQuery(filter) => {
                let filter = AssetPropertyFilter {
                    asset_uuids: self.template.expand_all(&filter.asset_uuids, scoped),
                    ..filter.clone()
                };
                self.api
                    .get_asset_properties(Some(&filter))
                    .await?
                    .into_iter()
                    .map(|property| find_value(property.name.clone(), property.name))
                    .collect()
            }
        };
        Ok(values)
    }

    /// 父资产展开：空选择保留为空串，由数据接口判定为"未选择"。
    fn expand_keeping_empty(&self, parents: &[String], scoped: &ScopedVars) -> Vec<String> {
        parents
            .iter()
            .flat_map(|parent| {
                let expanded = self.template.multi_select_replace(parent, scoped);
                if expanded.is_empty() {
                    vec![String::new()]
                } else {
                    expanded
                }
            })
            .collect()
    }
}

fn find_value(text: String, value: String) -> MetricFindValue {
    MetricFindValue { text, value }
}
