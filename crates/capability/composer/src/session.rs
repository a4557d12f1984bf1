//! 编辑器会话：参考数据加载门控
//!
//! `load()` 并发拉取资产、资产属性、事件类型、事件类型属性与事件配置，
//! 全部成功后才切换到 `Ready`；任一失败则保持 `Loading` 并上抛错误。
//! 服务端版本单独刷新，失败只记录日志。

use std::sync::Arc;

use domain::HistorianInfo;
use historian_data_api::DataApi;
use historian_options::{ReferenceSnapshot, ReferenceState};
use historian_telemetry::{
    SessionIds, new_session_ids, record_reference_fetch, record_reference_fetch_failure,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ComposerError;

/// 一次 `load()` 拉取的资源数。
const REFERENCE_FETCHES: u64 = 5;

pub struct EditorSession {
    api: Arc<dyn DataApi>,
    ids: SessionIds,
    reference: RwLock<ReferenceState>,
    info: RwLock<HistorianInfo>,
}

impl EditorSession {
    pub fn new(api: Arc<dyn DataApi>) -> Self {
        Self {
            api,
            ids: new_session_ids(),
            reference: RwLock::new(ReferenceState::Loading),
            info: RwLock::new(HistorianInfo::default()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.ids.session_id
    }

    pub fn api(&self) -> &Arc<dyn DataApi> {
        &self.api
    }

    /// 当前参考数据状态（快照以 `Arc` 共享）。
    pub async fn reference(&self) -> ReferenceState {
        self.reference.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.reference.read().await.is_loading()
    }

    pub async fn info(&self) -> HistorianInfo {
        self.info.read().await.clone()
    }

    pub async fn load(&self) -> Result<Arc<ReferenceSnapshot>, ComposerError> {
        let api = self.api.as_ref();
        let fetched = tokio::try_join!(
            api.get_assets(None),
            api.get_asset_properties(None),
            api.get_event_types(None),
            api.get_event_type_properties(None),
            api.get_event_configurations(),
        );
        let (assets, asset_properties, event_types, event_type_properties, event_configurations) =
            match fetched {
                Ok(fetched) => fetched,
                Err(err) => {
                    record_reference_fetch_failure();
                    warn!(session_id = %self.ids.session_id, error = %err, "reference load failed");
                    return Err(err.into());
                }
            };
        for _ in 0..REFERENCE_FETCHES {
            record_reference_fetch();
        }

        let snapshot = Arc::new(ReferenceSnapshot {
            assets,
            asset_properties,
            event_types,
            event_type_properties,
            event_configurations,
            info: self.info().await,
        });
        *self.reference.write().await = ReferenceState::Ready(snapshot.clone());
        info!(
            session_id = %self.ids.session_id,
            assets = snapshot.assets.len(),
            event_types = snapshot.event_types.len(),
            "reference data loaded"
        );
        Ok(snapshot)
    }

    /// 刷新服务端版本；失败时保留原值。
    pub async fn refresh_info(&self) {
        match self.api.get_info().await {
            Ok(info) => {
                record_reference_fetch();
                *self.info.write().await = info.clone();
                let mut reference = self.reference.write().await;
                let updated = reference.snapshot().map(|snapshot| ReferenceSnapshot {
                    info,
                    ..snapshot.clone()
                });
                if let Some(snapshot) = updated {
                    *reference = ReferenceState::ready(snapshot);
                }
            }
            Err(err) => {
                record_reference_fetch_failure();
                warn!(session_id = %self.ids.session_id, error = %err, "historian info unavailable");
            }
        }
    }
}
