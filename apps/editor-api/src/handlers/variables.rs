//! 模板变量取值
//!
//! - POST /api/variables/query - 执行变量查询，返回 `{text, value}` 列表

use api_contract::VariableQueryRequest;
use axum::{Json, extract::State, response::Response};
use historian_composer::VariableSupport;

use crate::AppState;
use crate::utils::{composer_error, ok, template_context};

pub async fn query_variable(
    State(state): State<AppState>,
    Json(req): Json<VariableQueryRequest>,
) -> Response {
    let support = VariableSupport::new(
        state.session.api().clone(),
        template_context(&req.variables),
    );
    match support.query(&req.query, &req.scoped_vars).await {
        Ok(values) => ok(values),
        Err(err) => composer_error(err),
    }
}
