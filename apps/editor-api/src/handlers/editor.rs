//! 查询编辑 handlers
//!
//! - POST /api/editor/event-options - 事件编辑器的全部可选项（选项依赖图）
//! - POST /api/editor/asset-tree - 资产级联树与搜索建议
//! - POST /api/editor/reduce - 合并一次字段更新
//! - POST /api/editor/tags - WHERE 标签行编辑
//! - POST /api/editor/filters - 标签行与结构化条件互转
//! - POST /api/editor/prepare - 执行前的模板展开与过滤值还原
//!
//! 每个请求基于会话当前的参考数据快照求值；加载期间依赖选项为空。

use api_contract::{
    AssetMatchDto, AssetTreeRequest, AssetTreeResponse, EventOptionsRequest,
    FilterConversionRequest, FilterConversionResponse, PrepareRequest, ReduceRequest,
    ReduceResponse, TagEdit, TagEditRequest,
};
use axum::{Json, extract::State, response::Response};
use domain::{FieldUpdate, HostQuery, PropertyType};
use historian_composer::{
    AnnotationEditor, ComposerError, ComposerSettings, EditorKind, QueryComposer, QueryHost,
    prepare_queries,
};
use historian_filter::{edit_tag_value, from_tags, push_tag, remove_tag, set_tag, to_tags};
use historian_options::{
    DEFAULT_SEPARATOR, EventSelection, OptionGraph, OptionResolver, flatten_options,
    search_options,
};

use crate::AppState;
use crate::utils::{bad_request_error, composer_error, hierarchy_error, ok, template_context};

/// 单次请求内的宿主：持有请求带来的查询，记录合并结果与执行请求。
struct RequestHost {
    query: HostQuery,
    runs: usize,
}

impl RequestHost {
    fn new(query: HostQuery) -> Self {
        Self { query, runs: 0 }
    }
}

impl QueryHost for RequestHost {
    fn query(&self) -> HostQuery {
        self.query.clone()
    }

    fn on_change(&mut self, query: HostQuery) {
        self.query = query;
    }

    fn on_run_query(&mut self) {
        self.runs += 1;
    }
}

pub async fn event_options(
    State(state): State<AppState>,
    Json(req): Json<EventOptionsRequest>,
) -> Response {
    let reference = state.session.reference().await;
    let template = template_context(&req.variables);
    let resolver = OptionResolver::new(&reference, &template, &state.settings.resolver);

    let mut selection = EventSelection::from_query(&req.query, reference.version());
    selection.value_key = req.value_key;
    selection.annotation = req.annotation;
    if req.annotation {
        selection.property_type = PropertyType::Simple;
    }
    match OptionGraph::new(selection, &resolver) {
        Ok(graph) => ok(graph.into_options()),
        Err(err) => hierarchy_error(err),
    }
}

pub async fn asset_tree(
    State(state): State<AppState>,
    Json(req): Json<AssetTreeRequest>,
) -> Response {
    let reference = state.session.reference().await;
    let template = template_context(&req.variables);
    let resolver = OptionResolver::new(&reference, &template, &state.settings.resolver);

    let tree = match resolver.asset_options(req.with_properties) {
        Ok(tree) => tree,
        Err(err) => return hierarchy_error(err),
    };
    let label = req
        .selector
        .as_deref()
        .map(|selector| resolver.initial_label(selector))
        .unwrap_or_default();
    let matches = match req.search.as_deref().filter(|input| !input.is_empty()) {
        Some(input) => {
            let separator = req.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            let flat = flatten_options(&tree, separator);
            search_options(&flat, input)
                .into_iter()
                .filter_map(|option| {
                    let selection = option.selection()?;
                    Some(AssetMatchDto {
                        label: option.label.clone(),
                        asset: selection.asset,
                        property: selection.property,
                    })
                })
                .collect()
        }
        None => Vec::new(),
    };
    ok(AssetTreeResponse {
        loading: resolver.is_loading(),
        tree,
        label,
        matches,
    })
}

pub async fn reduce_query(
    State(state): State<AppState>,
    Json(req): Json<ReduceRequest>,
) -> Response {
    let reference = state.session.reference().await;
    let template = template_context(&req.variables);
    let resolver = OptionResolver::new(&reference, &template, &state.settings.resolver);
    let settings = ComposerSettings::clone(&state.settings);
    let host = RequestHost::new(req.query);

    let (kind, result, runs) = if req.annotation {
        let mut editor = AnnotationEditor::new(host, settings);
        editor.initialize();
        let result = match req.update {
            FieldUpdate::Event(update) => editor.apply(update, &resolver),
            update => Err(ComposerError::Unsupported {
                kind: EditorKind::Annotation,
                update: format!("{update:?}"),
            }),
        };
        (EditorKind::Annotation, result, editor.into_host().runs)
    } else {
        let mut composer = QueryComposer::new(host, EditorKind::Query, settings);
        composer.initialize();
        let result = composer.apply(req.update, &resolver);
        (EditorKind::Query, result, composer.into_host().runs)
    };

    match result {
        Ok(query) => ok(ReduceResponse {
            runnable: kind.is_runnable(&query),
            run_requested: runs > 0,
            query,
        }),
        Err(err) => composer_error(err),
    }
}

pub async fn edit_tags(Json(req): Json<TagEditRequest>) -> Response {
    let index = match &req.edit {
        TagEdit::Push { .. } => None,
        TagEdit::Remove { index } | TagEdit::Set { index, .. } | TagEdit::EditValue { index, .. } => {
            Some(*index)
        }
    };
    if let Some(index) = index.filter(|index| *index >= req.tags.len()) {
        return bad_request_error(format!("tag index {index} out of range"));
    }

    let tags = match req.edit {
        TagEdit::Push { key } => push_tag(&req.tags, &key),
        TagEdit::Remove { index } => remove_tag(&req.tags, index),
        TagEdit::Set { index, tag } => set_tag(&req.tags, index, tag),
        TagEdit::EditValue { index, value } => {
            let edited = edit_tag_value(&req.tags[index], &value);
            set_tag(&req.tags, index, edited)
        }
    };
    ok(tags)
}

pub async fn convert_filters(
    State(state): State<AppState>,
    Json(req): Json<FilterConversionRequest>,
) -> Response {
    let reference = state.session.reference().await;
    let template = template_context(&req.variables);
    let resolver = OptionResolver::new(&reference, &template, &state.settings.resolver);

    let (tags, filters) = match (req.filters, req.tags) {
        (_, Some(tags)) => {
            let filters = from_tags(&tags, |name, is_parent| {
                resolver.property_datatype(name, is_parent, &req.event_types)
            });
            (tags, filters)
        }
        (Some(filters), None) => (to_tags(&filters), filters),
        (None, None) => return bad_request_error("filters or tags required"),
    };
    ok(FilterConversionResponse { tags, filters })
}

pub async fn prepare(State(state): State<AppState>, Json(req): Json<PrepareRequest>) -> Response {
    let template = template_context(&req.variables);
    ok(prepare_queries(
        &req.targets,
        &template,
        &req.scoped_vars,
        state.settings.default_series_limit,
    ))
}
