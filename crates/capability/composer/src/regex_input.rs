//! 可能为正则的文本输入校验。

use historian_filter::{is_regex, is_valid_regex};
use historian_telemetry::record_invalid_regex_input;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::settings::ComposerSettings;

pub const INVALID_REGEX_MESSAGE: &str = "Invalid regex";

/// 输入值及其校验结果。普通文本总是有效；`/…/` 形式需要能编译。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexInput {
    pub value: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegexInput {
    pub fn validate(text: &str) -> Self {
        let valid = !is_regex(text) || is_valid_regex(text);
        if !valid {
            record_invalid_regex_input();
        }
        Self {
            value: text.to_string(),
            valid,
            error: (!valid).then(|| INVALID_REGEX_MESSAGE.to_string()),
        }
    }
}

/// 可能为正则的输入框：每次输入立即校验并返回结果，
/// 在配置的静默窗口结束后只提交最后一次输入。
#[derive(Debug, Clone)]
pub struct RegexInputField {
    debouncer: Debouncer<RegexInput>,
}

impl RegexInputField {
    pub fn spawn<F>(settings: &ComposerSettings, commit: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(RegexInput) + Send + 'static,
    {
        let (debouncer, handle) = Debouncer::spawn(settings.debounce, commit);
        (Self { debouncer }, handle)
    }

    pub fn input(&self, text: &str) -> RegexInput {
        let state = RegexInput::validate(text);
        self.debouncer.push(state.clone());
        state
    }
}
