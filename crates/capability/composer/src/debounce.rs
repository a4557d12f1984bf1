//! 自由文本输入防抖
//!
//! 每次输入重置静默窗口；窗口内无新输入时只提交最后一个值。
//! 发送端全部释放时立即提交尚未提交的值。

use std::time::Duration;

use historian_telemetry::record_debounced_flush;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// 默认静默窗口。
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// 启动后台任务；`flush` 在任务内按顺序调用。
    pub fn spawn<F>(window: Duration, flush: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(rx, window, flush));
        (Self { tx }, handle)
    }

    /// 提交新值；后台任务已退出时返回 `false`。
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

async fn run<T, F>(mut rx: mpsc::UnboundedReceiver<T>, window: Duration, mut flush: F)
where
    F: FnMut(T),
{
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(value) => latest = value,
                    None => {
                        flush(latest);
                        record_debounced_flush();
                        return;
                    }
                },
                _ = sleep(window) => {
                    flush(latest);
                    record_debounced_flush();
                    break;
                }
            }
        }
    }
}
