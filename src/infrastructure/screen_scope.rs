//! 页面生命周期 - 基础设施层
//!
//! 一个页面（搜索页、作业页、推荐页）的所有异步操作共享同一个 `ScreenScope`。
//! 页面销毁时调用 [`ScreenScope::close`]：进行中的操作立即以取消结束，
//! 之后到达的结果在落地前检查 [`ScreenScope::is_alive`] 后被丢弃。

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AppResult, BusinessError};

/// 页面存活标记，克隆后共享同一个取消令牌
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// 销毁页面，取消所有挂在该页面上的操作
    pub fn close(&self) {
        if self.is_alive() {
            debug!("页面已关闭，取消未完成的操作");
        }
        self.token.cancel();
    }

    /// 等待页面关闭
    pub async fn closed(&self) {
        self.token.cancelled().await
    }

    /// 在页面生命周期内执行 `fut`
    ///
    /// 页面先于 `fut` 关闭时返回 [`BusinessError::Cancelled`]，`fut` 被丢弃
    pub async fn run<F: Future>(&self, fut: F) -> AppResult<F::Output> {
        if !self.is_alive() {
            return Err(BusinessError::Cancelled.into());
        }
        tokio::select! {
            out = fut => Ok(out),
            _ = self.token.cancelled() => Err(BusinessError::Cancelled.into()),
        }
    }

    /// 延迟结果落地前的检查
    pub fn ensure_alive(&self) -> AppResult<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(BusinessError::Cancelled.into())
        }
    }
}
