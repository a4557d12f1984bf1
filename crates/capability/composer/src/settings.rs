//! 编辑器行为设置（由运行配置派生）。

use std::time::Duration;

use domain::{DownstreamPolicy, TabIndex};
use historian_config::EditorConfig;
use historian_options::ResolverSettings;

#[derive(Debug, Clone)]
pub struct ComposerSettings {
    pub policy: DownstreamPolicy,
    /// 告警场景下新查询默认取最新值。
    pub alerting: bool,
    pub default_series_limit: u32,
    pub default_tab: TabIndex,
    pub debounce: Duration,
    pub resolver: ResolverSettings,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for ComposerSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            policy: config.downstream_policy,
            alerting: config.alerting,
            default_series_limit: config.default_series_limit,
            default_tab: config.default_tab,
            debounce: config.debounce(),
            resolver: ResolverSettings {
                extended_operators_version: config.extended_operators_version.clone(),
                duration_filter_version: config.duration_filter_version.clone(),
            },
        }
    }
}
