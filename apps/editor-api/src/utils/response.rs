//! HTTP 响应辅助函数和 DTO 转换
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码对应：
//! - 400 INVALID.REQUEST / EDITOR.INVALID_UPDATE
//! - 422 REFERENCE.CYCLIC_HIERARCHY
//! - 502 REFERENCE.UNAVAILABLE

use api_contract::{ApiResponse, MetricsSnapshotDto, ReferenceStatusDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::HistorianInfo;
use historian_composer::ComposerError;
use historian_data_api::DataApiError;
use historian_options::{ReferenceState, TreeError};
use historian_telemetry::MetricsSnapshot;

/// 成功响应
pub fn ok<T: serde::Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资产层级成环
pub fn hierarchy_error(err: TreeError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::<()>::error(
            "REFERENCE.CYCLIC_HIERARCHY",
            err.to_string(),
        )),
    )
        .into_response()
}

/// 历史库不可用
pub fn reference_unavailable_error(err: DataApiError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiResponse::<()>::error(
            "REFERENCE.UNAVAILABLE",
            err.to_string(),
        )),
    )
        .into_response()
}

pub fn composer_error(err: ComposerError) -> Response {
    match err {
        ComposerError::Tree(err) => hierarchy_error(err),
        ComposerError::Data(err) => reference_unavailable_error(err),
        err @ (ComposerError::BodyMismatch { .. } | ComposerError::Unsupported { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                "EDITOR.INVALID_UPDATE",
                err.to_string(),
            )),
        )
            .into_response(),
    }
}

/// ReferenceState 转 ReferenceStatusDto
pub fn reference_to_dto(
    session_id: &str,
    reference: &ReferenceState,
    info: &HistorianInfo,
) -> ReferenceStatusDto {
    let snapshot = reference.snapshot();
    ReferenceStatusDto {
        session_id: session_id.to_string(),
        loading: reference.is_loading(),
        version: info.version.clone(),
        api_version: info.api_version.clone(),
        assets: snapshot.map_or(0, |snapshot| snapshot.assets.len()),
        asset_properties: snapshot.map_or(0, |snapshot| snapshot.asset_properties.len()),
        event_types: snapshot.map_or(0, |snapshot| snapshot.event_types.len()),
        event_type_properties: snapshot.map_or(0, |snapshot| snapshot.event_type_properties.len()),
        event_configurations: snapshot.map_or(0, |snapshot| snapshot.event_configurations.len()),
    }
}

/// MetricsSnapshot 转 MetricsSnapshotDto
pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        reference_fetches: snapshot.reference_fetches,
        reference_fetch_failures: snapshot.reference_fetch_failures,
        query_changes: snapshot.query_changes,
        runs_requested: snapshot.runs_requested,
        runs_suppressed: snapshot.runs_suppressed,
        debounced_flushes: snapshot.debounced_flushes,
        invalid_regex_inputs: snapshot.invalid_regex_inputs,
    }
}
