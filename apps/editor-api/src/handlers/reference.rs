//! 参考数据 handlers
//!
//! - GET /api/reference/status - 当前加载状态与各类参考数据数量
//! - POST /api/reference/refresh - 重新拉取服务端版本与全部参考数据
//!
//! 加载失败时会话保持加载态，返回 502。

use axum::{extract::State, response::Response};
use tracing::info;

use crate::AppState;
use crate::utils::{composer_error, ok, reference_to_dto};

pub async fn reference_status(State(state): State<AppState>) -> Response {
    let reference = state.session.reference().await;
    let info = state.session.info().await;
    ok(reference_to_dto(state.session.session_id(), &reference, &info))
}

pub async fn refresh_reference(State(state): State<AppState>) -> Response {
    state.session.refresh_info().await;
    if let Err(err) = state.session.load().await {
        return composer_error(err);
    }
    let reference = state.session.reference().await;
    let info = state.session.info().await;
    info!(version = %info.version, "reference refreshed");
    ok(reference_to_dto(state.session.session_id(), &reference, &info))
}
