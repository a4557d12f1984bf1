//! 查询 reducer
//!
//! `reduce(current, update)` 产出新的查询对象，不修改 `current`。
//! 字段更新按查询体类型分派；切换查询类型时查询体整体替换为新类型的空形状。

use domain::{
    AssetMeasurementQuery, AssetMeasurementUpdate, DownstreamPolicy, EventQuery, EventUpdate,
    FieldUpdate, HostQuery, MeasurementQuery, MeasurementQueryOptions, MeasurementUpdate,
    PropertyType, QueryBody, QueryType, RawQuery, RawUpdate,
};
use historian_filter::from_tags;
use historian_options::OptionResolver;

use crate::error::ComposerError;

/// 合并时需要的参考数据视图与策略。
pub struct ReduceContext<'a> {
    pub resolver: &'a OptionResolver<'a>,
    pub policy: DownstreamPolicy,
    pub alerting: bool,
}

impl ReduceContext<'_> {
    /// 参考数据加载期间不做裁剪。
    fn prunes(&self) -> bool {
        self.policy == DownstreamPolicy::Prune && !self.resolver.is_loading()
    }
}

pub fn reduce(
    current: &HostQuery,
    update: FieldUpdate,
    ctx: &ReduceContext<'_>,
) -> Result<HostQuery, ComposerError> {
    let mut next = current.clone();
    let found = next.query_type();
    match update {
        FieldUpdate::QueryType(query_type) => switch_query_type(&mut next, query_type, ctx.alerting),
        FieldUpdate::TabIndex(tab) => switch_query_type(&mut next, tab.query_type(), ctx.alerting),
        FieldUpdate::SeriesLimit(limit) => next.series_limit = Some(limit),
        FieldUpdate::Event(update) => match next.body.as_mut() {
            Some(QueryBody::EventQuery(query)) => reduce_event(query, update, ctx),
            _ => return Err(mismatch(QueryType::EventQuery, found)),
        },
        FieldUpdate::Measurement(update) => match next.body.as_mut() {
            Some(QueryBody::MeasurementQuery(query)) => reduce_measurement(query, update),
            _ => return Err(mismatch(QueryType::MeasurementQuery, found)),
        },
        FieldUpdate::AssetMeasurement(update) => match next.body.as_mut() {
            Some(QueryBody::AssetMeasurementQuery(query)) => {
                reduce_asset_measurement(query, update, ctx)
            }
            _ => return Err(mismatch(QueryType::AssetMeasurementQuery, found)),
        },
        FieldUpdate::Raw(update) => match next.body.as_mut() {
            Some(QueryBody::RawQuery(query)) => reduce_raw(query, update),
            _ => return Err(mismatch(QueryType::RawQuery, found)),
        },
    }
    Ok(next)
}

fn mismatch(expected: QueryType, found: Option<QueryType>) -> ComposerError {
    ComposerError::BodyMismatch { expected, found }
}

/// 新类型的空查询体；测点类查询带默认选项。
pub fn empty_body(query_type: QueryType, alerting: bool) -> QueryBody {
    match query_type {
        QueryType::MeasurementQuery => QueryBody::MeasurementQuery(MeasurementQuery {
            options: MeasurementQueryOptions::default_for(alerting),
            ..MeasurementQuery::default()
        }),
        QueryType::AssetMeasurementQuery => {
            QueryBody::AssetMeasurementQuery(AssetMeasurementQuery {
                options: MeasurementQueryOptions::default_for(alerting),
                ..AssetMeasurementQuery::default()
            })
        }
        other => other.empty_body(),
    }
}

fn switch_query_type(query: &mut HostQuery, query_type: QueryType, alerting: bool) {
    query.tab_index = Some(query_type.tab());
    if query.query_type() != Some(query_type) {
        query.body = Some(empty_body(query_type, alerting));
    }
}

fn reduce_event(query: &mut EventQuery, update: EventUpdate, ctx: &ReduceContext<'_>) {
    let resolver = ctx.resolver;
    match update {
        EventUpdate::Asset(asset) => {
            if !resolver.is_asset_selector(&asset) {
                if !query.assets.is_empty() {
                    query.assets.clear();
                    query.event_types.clear();
                    query.properties.clear();
                }
                return;
            }
            query.assets = vec![asset];
            if ctx.prunes() {
                prune_event_types(query, resolver);
                prune_properties(query, resolver);
            }
        }
        EventUpdate::EventTypes(event_types) => {
            query.event_types = resolver.resolve_event_types(&event_types);
            if ctx.prunes() {
                prune_event_types(query, resolver);
                prune_properties(query, resolver);
            }
        }
        EventUpdate::PropertyType(property_type) => {
            query.property_type = property_type;
            if ctx.prunes() {
                prune_properties(query, resolver);
            }
        }
        EventUpdate::IncludeParentInfo(include) => {
            query.include_parent_info = include;
            if ctx.prunes() {
                prune_properties(query, resolver);
            }
        }
        EventUpdate::PropertyTags(tags) => {
            let event_types = &query.event_types;
            query.property_filter = from_tags(&tags, |name, is_parent| {
                resolver.property_datatype(name, is_parent, event_types)
            });
        }
        EventUpdate::QueryAssetProperties(enabled) => {
            query.query_asset_properties = enabled;
            if enabled && query.options.is_none() {
                query.options = Some(MeasurementQueryOptions::default_for(ctx.alerting));
            }
        }
        EventUpdate::Statuses(statuses) => query.statuses = statuses,
        EventUpdate::Properties(properties) => query.properties = properties,
        EventUpdate::OverrideAssets(assets) => query.override_assets = assets,
        EventUpdate::AssetProperties(properties) => query.asset_properties = properties,
        EventUpdate::Options(options) => query.options = Some(options),
        EventUpdate::Limit(limit) => query.limit = limit,
    }
}

fn prune_event_types(query: &mut EventQuery, resolver: &OptionResolver<'_>) {
    let asset = query.assets.first().map(String::as_str).unwrap_or_default();
    query.event_types = resolver.filter_event_types(&query.event_types, asset);
}

fn prune_properties(query: &mut EventQuery, resolver: &OptionResolver<'_>) {
    let include_parent =
        query.include_parent_info && query.property_type == PropertyType::Simple;
    query.properties = resolver.filter_properties(
        &query.properties,
        &query.event_types,
        include_parent,
        query.property_type,
    );
}

fn reduce_measurement(query: &mut MeasurementQuery, update: MeasurementUpdate) {
    match update {
        MeasurementUpdate::Databases(databases) => query.databases = databases,
        MeasurementUpdate::Measurements(measurements) => query.measurements = measurements,
        MeasurementUpdate::Regex { regex, is_regex } => {
            query.regex = regex;
            query.is_regex = is_regex;
        }
        MeasurementUpdate::Options(options) => query.options = options,
    }
}

fn reduce_asset_measurement(
    query: &mut AssetMeasurementQuery,
    update: AssetMeasurementUpdate,
    ctx: &ReduceContext<'_>,
) {
    let resolver = ctx.resolver;
    match update {
        AssetMeasurementUpdate::Asset { asset, property } => {
            if !resolver.is_asset_selector(&asset) {
                if !query.assets.is_empty() {
                    query.assets.clear();
                    query.asset_properties.clear();
                }
                return;
            }
            query.assets = vec![asset];
            match property {
                Some(uuid) => {
                    let name = resolver
                        .asset_property_name(&uuid)
                        .map(str::to_string)
                        .unwrap_or(uuid);
                    query.asset_properties = vec![name];
                }
                None if ctx.prunes() => {
                    let available: Vec<String> = resolver
                        .available_asset_properties(&query.assets)
                        .into_iter()
                        .map(|option| option.value)
                        .collect();
                    query
                        .asset_properties
                        .retain(|property| available.contains(property));
                }
                None => {}
            }
        }
        AssetMeasurementUpdate::AssetProperties(properties) => query.asset_properties = properties,
        AssetMeasurementUpdate::Options(options) => query.options = options,
    }
}

fn reduce_raw(query: &mut RawQuery, update: RawUpdate) {
    match update {
        RawUpdate::Database(database) => query.timeseries_database = database,
        RawUpdate::Query(text) => query.query = text,
    }
}

fn has_value(values: &[String]) -> bool {
    values.iter().any(|value| !value.is_empty())
}

/// 事件查询需要资产与事件类型。
pub fn is_event_runnable(query: &EventQuery) -> bool {
    has_value(&query.assets) && has_value(&query.event_types)
}

/// 查询是否足够完整，可以请求执行。
pub fn is_runnable(query: &HostQuery) -> bool {
    match &query.body {
        Some(QueryBody::MeasurementQuery(query)) => {
            if query.is_regex {
                !query.regex.is_empty()
            } else {
                has_value(&query.measurements)
            }
        }
        Some(QueryBody::AssetMeasurementQuery(query)) => has_value(&query.asset_properties),
        Some(QueryBody::EventQuery(query)) => is_event_runnable(query),
        Some(QueryBody::RawQuery(query)) => !query.query.is_empty(),
        None => false,
    }
}
