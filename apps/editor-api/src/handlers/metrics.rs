//! 编辑器计数器快照。
//!
//! - GET /api/metrics

use axum::response::Response;
use historian_telemetry::metrics;

use crate::utils::{metrics_to_dto, ok};

pub async fn get_metrics() -> Response {
    ok(metrics_to_dto(metrics().snapshot()))
}
