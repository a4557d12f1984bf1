//! 追踪、会话 ID 与编辑器计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 编辑器会话标识（每个编辑器实例一个）。
#[derive(Debug, Clone)]
pub struct SessionIds {
    pub session_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reference_fetches: u64,
    pub reference_fetch_failures: u64,
    pub query_changes: u64,
    pub runs_requested: u64,
    pub runs_suppressed: u64,
    pub debounced_flushes: u64,
    pub invalid_regex_inputs: u64,
}

/// 编辑器计数器。
pub struct EditorMetrics {
    reference_fetches: AtomicU64,
    reference_fetch_failures: AtomicU64,
    query_changes: AtomicU64,
    runs_requested: AtomicU64,
    runs_suppressed: AtomicU64,
    debounced_flushes: AtomicU64,
    invalid_regex_inputs: AtomicU64,
}

impl EditorMetrics {
    pub fn new() -> Self {
        Self {
            reference_fetches: AtomicU64::new(0),
            reference_fetch_failures: AtomicU64::new(0),
            query_changes: AtomicU64::new(0),
            runs_requested: AtomicU64::new(0),
            runs_suppressed: AtomicU64::new(0),
            debounced_flushes: AtomicU64::new(0),
            invalid_regex_inputs: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reference_fetches: self.reference_fetches.load(Ordering::Relaxed),
            reference_fetch_failures: self.reference_fetch_failures.load(Ordering::Relaxed),
            query_changes: self.query_changes.load(Ordering::Relaxed),
            runs_requested: self.runs_requested.load(Ordering::Relaxed),
            runs_suppressed: self.runs_suppressed.load(Ordering::Relaxed),
            debounced_flushes: self.debounced_flushes.load(Ordering::Relaxed),
            invalid_regex_inputs: self.invalid_regex_inputs.load(Ordering::Relaxed),
        }
    }
}

impl Default for EditorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<EditorMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static EditorMetrics {
    METRICS.get_or_init(EditorMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 生成新的编辑器会话标识。
pub fn new_session_ids() -> SessionIds {
    SessionIds {
        session_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次参考数据拉取。
pub fn record_reference_fetch() {
    metrics().reference_fetches.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次参考数据拉取失败。
pub fn record_reference_fetch_failure() {
    metrics()
        .reference_fetch_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次向宿主提交的查询变更。
pub fn record_query_change() {
    metrics().query_changes.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次执行请求。
pub fn record_run_requested() {
    metrics().runs_requested.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次因查询不完整而被拦截的执行请求。
pub fn record_run_suppressed() {
    metrics().runs_suppressed.fetch_add(1, Ordering::Relaxed);
}

pub fn record_debounced_flush() {
    metrics().debounced_flushes.fetch_add(1, Ordering::Relaxed);
}

pub fn record_invalid_regex_input() {
    metrics().invalid_regex_inputs.fetch_add(1, Ordering::Relaxed);
}
