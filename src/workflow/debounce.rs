//! 搜索框防抖 - 流程层
//!
//! 每次输入都重新计时，静默期满后只交出最后一次输入

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::config::Config;

/// 按配置的防抖间隔创建输入端 / 防抖端
pub fn from_config(config: &Config) -> (QueryInput, QueryDebouncer) {
    channel(Duration::from_millis(config.search_debounce_ms))
}

/// 创建一对输入端 / 防抖端
pub fn channel(quiet: Duration) -> (QueryInput, QueryDebouncer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueryInput { tx }, QueryDebouncer { rx, quiet })
}

/// 输入端，可克隆给多个输入源
#[derive(Debug, Clone)]
pub struct QueryInput {
    tx: mpsc::UnboundedSender<String>,
}

impl QueryInput {
    /// 推送一次输入，防抖端已关闭时返回 false
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }
}

/// 防抖端
#[derive(Debug)]
pub struct QueryDebouncer {
    rx: mpsc::UnboundedReceiver<String>,
    quiet: Duration,
}

impl QueryDebouncer {
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// 等到下一次静默期满的输入
    ///
    /// 所有输入端都已关闭且没有待定输入时返回 None
    pub async fn next_settled(&mut self) -> Option<String> {
        let mut pending = self.rx.recv().await?;
        let mut deadline = Instant::now() + self.quiet;

        loop {
            tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(text) => {
                        pending = text;
                        deadline = Instant::now() + self.quiet;
                    }
                    // 输入端全部关闭，交出最后一次输入
                    None => return Some(pending),
                },
                _ = sleep_until(deadline) => {
                    debug!("⌨️ 输入已静默 {:?}: {:?}", self.quiet, pending);
                    return Some(pending);
                }
            }
        }
    }
}
