//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 参考数据：/api/reference/status, /api/reference/refresh
//! - 计数器：/api/metrics
//! - 查询编辑：/api/editor/*
//! - 模板变量：/api/variables/query

use crate::AppState;
use crate::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/reference/status", get(reference_status))
        .route("/api/reference/refresh", post(refresh_reference))
        .route("/api/metrics", get(get_metrics))
        .route("/api/editor/event-options", post(event_options))
        .route("/api/editor/asset-tree", post(asset_tree))
        .route("/api/editor/reduce", post(reduce_query))
        .route("/api/editor/tags", post(edit_tags))
        .route("/api/editor/filters", post(convert_filters))
        .route("/api/editor/prepare", post(prepare))
        .route("/api/variables/query", post(query_variable))
}
