//! 编辑器核心的 HTTP/JSON 适配层。
//!
//! 宿主通过本服务取得级联选项、提交字段更新、准备执行查询与取模板变量值；
//! 参考数据在进程内按会话缓存，由 `/api/reference/refresh` 重新加载。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use axum::Router;
use historian_composer::{ComposerSettings, EditorSession};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<EditorSession>,
    pub settings: Arc<ComposerSettings>,
}

impl AppState {
    pub fn new(session: Arc<EditorSession>, settings: ComposerSettings) -> Self {
        Self {
            session,
            settings: Arc::new(settings),
        }
    }
}

/// 组装完整路由，外层注入 request_id/trace_id 与 HTTP 追踪。
pub fn build_app(state: AppState) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http())
}
