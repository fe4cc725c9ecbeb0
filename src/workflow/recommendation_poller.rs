//! 推荐轮询 - 流程层
//!
//! 流程顺序：
//! 1. 触发服务端生成推荐，失败则整体失败
//! 2. 有限次轮询推荐 id，过滤掉已经见过的 id，拿到第一批新 id 即返回
//! 3. 逐个（串行）拉取详情，以流的形式交给调用方，失败的用占位记录代替
//!
//! 已见 id 集合跟随轮询器（即页面）的生命周期，多次 `refresh()` 之间不清空

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::clients::Backend;
use crate::config::Config;
use crate::error::{AppError, AppResult, BusinessError};
use crate::infrastructure::ScreenScope;
use crate::models::RecommendedPractice;

/// 推荐轮询器
pub struct RecommendationPoller {
    backend: Arc<dyn Backend>,
    scope: ScreenScope,
    seen: HashSet<i64>,
    max_attempts: usize,
    delay: Duration,
}

impl RecommendationPoller {
    pub fn new(backend: Arc<dyn Backend>, scope: ScreenScope, config: &Config) -> Self {
        Self::with_policy(
            backend,
            scope,
            config.recommend_max_attempts,
            Duration::from_millis(config.recommend_delay_ms),
        )
    }

    pub fn with_policy(
        backend: Arc<dyn Backend>,
        scope: ScreenScope,
        max_attempts: usize,
        delay: Duration,
    ) -> Self {
        Self {
            backend,
            scope,
            seen: HashSet::new(),
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn seen(&self) -> &HashSet<i64> {
        &self.seen
    }

    /// 把已经展示过的 id 记为已见
    pub fn mark_seen(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.seen.extend(ids);
    }

    /// 清空已见集合，下一次 `refresh()` 重新接受所有 id
    pub fn reset_seen(&mut self) {
        self.seen.clear();
    }

    /// 触发推荐并轮询出一批新的题目 id
    pub async fn refresh(&mut self) -> AppResult<Vec<i64>> {
        info!("🎯 触发推荐生成...");
        match self.scope.run(self.backend.trigger_recommendation()).await? {
            Ok(()) => {}
            Err(e) => {
                warn!("⚠️ 触发推荐失败: {}", e);
                return Err(BusinessError::RecommendTriggerFailed.into());
            }
        }

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                self.scope.run(tokio::time::sleep(self.delay)).await?;
            }

            let ids = match self.scope.run(self.backend.recommendation_ids()).await? {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("[第 {} 次轮询] ⚠️ 拉取推荐失败: {}", attempt, e);
                    continue;
                }
            };

            let fresh = self.take_unseen(ids);
            if fresh.is_empty() {
                debug!("[第 {} 次轮询] 没有新的推荐", attempt);
                continue;
            }

            info!(
                "[第 {} 次轮询] ✓ 获得 {} 个新推荐: {:?}",
                attempt,
                fresh.len(),
                fresh
            );
            return Ok(fresh);
        }

        warn!("⚠️ 轮询 {} 次仍没有新推荐", self.max_attempts);
        Err(BusinessError::NoRecommendations.into())
    }

    /// 过滤已见 id 和批内重复，保持原顺序，并记为已见
    fn take_unseen(&mut self, ids: Vec<i64>) -> Vec<i64> {
        ids.into_iter().filter(|id| self.seen.insert(*id)).collect()
    }

    /// 逐个拉取详情
    ///
    /// 每解析完一个就产出一个；页面关闭后流立即结束
    pub fn resolve(&self, ids: Vec<i64>) -> impl Stream<Item = RecommendedPractice> + Send + 'static {
        let backend = Arc::clone(&self.backend);
        let before = self.scope.clone();
        let after = self.scope.clone();

        stream::iter(ids)
            .take_while(move |_| futures::future::ready(before.is_alive()))
            .then(move |id| {
                let backend = Arc::clone(&backend);
                async move {
                    match backend.question_detail(id).await {
                        Ok(detail) => RecommendedPractice::from_detail(id, detail),
                        Err(e) => {
                            warn!("⚠️ 推荐题目 {} 详情获取失败，使用占位: {}", id, e);
                            RecommendedPractice::placeholder(id)
                        }
                    }
                }
            })
            .take_while(move |_| futures::future::ready(after.is_alive()))
    }

    /// 触发、轮询、解析一步完成
    pub async fn refresh_and_resolve(
        &mut self,
    ) -> AppResult<impl Stream<Item = RecommendedPractice> + Send + 'static> {
        let ids = self.refresh().await?;
        Ok(self.resolve(ids))
    }
}

/// 是否为"暂无推荐"这一类可以静默处理的结果
pub fn is_empty_result(err: &AppError) -> bool {
    matches!(err, AppError::Business(BusinessError::NoRecommendations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, MockBackend};

    fn poller(mock: &Arc<MockBackend>) -> RecommendationPoller {
        RecommendationPoller::with_policy(mock.clone(), ScreenScope::new(), 4, Duration::from_millis(800))
    }

    #[tokio::test(start_paused = true)]
    async fn third_attempt_with_one_new_id_succeeds() {
        let mock = Arc::new(MockBackend::new());
        mock.push_recommend_batch(vec![1, 2]);
        mock.push_recommend_batch(vec![2]);
        mock.push_recommend_batch(vec![1, 7, 7]);
        let mut poller = poller(&mock);
        poller.mark_seen([1, 2]);

        let start = tokio::time::Instant::now();
        let ids = poller.refresh().await.unwrap();
        assert_eq!(ids, vec![7]);
        assert_eq!(mock.recommend_poll_count(), 3);
        // 两次间隔
        assert!(start.elapsed() >= Duration::from_millis(1600));
        assert!(start.elapsed() < Duration::from_millis(2400));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_no_recommendations() {
        let mock = Arc::new(MockBackend::new());
        let mut poller = poller(&mock);

        let err = poller.refresh().await.unwrap_err();
        assert!(is_empty_result(&err));
        assert_eq!(mock.recommend_poll_count(), 4);
    }

    #[tokio::test]
    async fn trigger_failure_fails_fast() {
        let mock = Arc::new(MockBackend::new());
        mock.set_trigger_ok(false);
        let mut poller = poller(&mock);

        let err = poller.refresh().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(BusinessError::RecommendTriggerFailed)
        ));
        assert_eq!(mock.recommend_poll_count(), 0);
    }

    #[tokio::test]
    async fn seen_ids_persist_across_refreshes() {
        let mock = Arc::new(MockBackend::new());
        mock.push_recommend_batch(vec![3, 4]);
        mock.push_recommend_batch(vec![3, 4, 5]);
        let mut poller = poller(&mock);

        assert_eq!(poller.refresh().await.unwrap(), vec![3, 4]);
        assert_eq!(poller.refresh().await.unwrap(), vec![5]);

        poller.reset_seen();
        mock.push_recommend_batch(vec![3]);
        assert_eq!(poller.refresh().await.unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn resolution_is_sequential_with_placeholders() {
        let mock = Arc::new(MockBackend::new());
        mock.set_detail(detail(10, &["a", "b"], 1));
        mock.fail_detail(11);
        mock.set_detail(detail(12, &["a", "b"], 0));
        let poller = poller(&mock);

        let resolved: Vec<RecommendedPractice> = poller.resolve(vec![10, 11, 12]).collect().await;
        let ids: Vec<i64> = resolved.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert!(!resolved[0].placeholder);
        assert!(resolved[1].placeholder);
        assert_eq!(resolved[1].title, "Question #11");
        assert_eq!(resolved[1].image_base64, None);
        assert_eq!(mock.detail_requests(), vec![10, 11, 12]);
        assert_eq!(mock.max_concurrent_details(), 1);
    }

    #[tokio::test]
    async fn closed_scope_stops_the_stream() {
        let mock = Arc::new(MockBackend::new());
        mock.set_detail(detail(10, &["a"], 0));
        mock.set_detail(detail(11, &["a"], 0));
        let scope = ScreenScope::new();
        let poller = RecommendationPoller::with_policy(mock.clone(), scope.clone(), 4, Duration::ZERO);

        let mut stream = Box::pin(poller.resolve(vec![10, 11]));
        assert_eq!(stream.next().await.map(|r| r.id), Some(10));
        scope.close();
        assert_eq!(stream.next().await, None);
        assert_eq!(mock.detail_requests(), vec![10]);
    }
}
