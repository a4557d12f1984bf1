//! editor-api 入口：加载配置、连接历史库、预热参考数据并启动 HTTP 服务。

use std::sync::Arc;

use editor_api::{AppState, build_app};
use historian_composer::{ComposerSettings, EditorSession};
use historian_config::EditorConfig;
use historian_data_api::HttpDataApi;
use historian_telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = EditorConfig::from_env()?;
    init_tracing();

    let api = HttpDataApi::new(
        config.historian_url.clone(),
        config.historian_token.clone(),
        config.historian_timeout(),
    )?;
    let session = Arc::new(EditorSession::new(Arc::new(api)));

    // 后台预热：失败时保持加载态，等待宿主调用 refresh
    let warmup = session.clone();
    tokio::spawn(async move {
        warmup.refresh_info().await;
        if let Err(err) = warmup.load().await {
            warn!(error = %err, "initial reference load failed");
        }
    });

    let state = AppState::new(session, ComposerSettings::from(&config));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, historian = %config.historian_url, "editor-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
