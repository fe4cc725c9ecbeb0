//! 题库浏览 - 流程层
//!
//! 组合筛选状态、分页控制和代数计数：
//! - `search()` 开启新一代，从第 1 页替换
//! - `load_next()` 追加下一页，受在途标记保护
//! - 每次成功拿到非空页后，用这一页重算筛选候选
//!
//! 网络请求和状态落地分两步：`begin_*` 生成 [`PendingPage`]，
//! [`fetch_page`] 发请求，[`QuestionBrowser::apply`] 凭票落地。
//! 两步之间可以开始新的搜索，旧结果回来时会被丢弃。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::Backend;
use crate::error::{AppError, AppResult, BusinessError};
use crate::infrastructure::ScreenScope;
use crate::models::{QuestionSummary, SearchQuery};
use crate::workflow::debounce::QueryDebouncer;
use crate::workflow::facet_state::{FacetDimension, FacetState};
use crate::workflow::pagination::{LoadMode, PageOutcome, PageTicket, PaginationController};

/// 已发出、尚未落地的一页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPage {
    pub ticket: PageTicket,
    pub query: SearchQuery,
}

/// 一次浏览操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseOutcome {
    /// 新增 `added` 条，列表共 `total` 条
    Loaded { added: usize, total: usize },
    /// 空页，没有更多结果
    NoMore,
    /// 结果已过期或页面已关闭，未改变任何状态
    Discarded,
}

/// 发出一页请求
pub async fn fetch_page(
    backend: &dyn Backend,
    pending: &PendingPage,
) -> AppResult<Vec<QuestionSummary>> {
    backend.search_questions(&pending.query).await
}

/// 题库浏览控制器
pub struct QuestionBrowser {
    backend: Arc<dyn Backend>,
    facets: FacetState,
    pager: PaginationController<QuestionSummary>,
    query: String,
    scope: ScreenScope,
}

impl QuestionBrowser {
    pub fn new(backend: Arc<dyn Backend>, scope: ScreenScope) -> Self {
        Self {
            backend,
            facets: FacetState::new(),
            pager: PaginationController::new(),
            query: String::new(),
            scope,
        }
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn facets(&self) -> &FacetState {
        &self.facets
    }

    /// 修改筛选后需要调用 `search()` 生效
    pub fn facets_mut(&mut self) -> &mut FacetState {
        &mut self.facets
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// 直接设置关键字（不经过防抖）
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn items(&self) -> &[QuestionSummary] {
        self.pager.items()
    }

    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    pub fn cursor(&self) -> u32 {
        self.pager.cursor()
    }

    pub fn generation(&self) -> u64 {
        self.pager.generation()
    }

    fn build_query(&self, page: u32) -> SearchQuery {
        SearchQuery {
            question_name: self.query.trim().to_string(),
            grade: self.facets.wire_value(FacetDimension::Grade),
            subject: self.facets.wire_value(FacetDimension::Subject),
            category: self.facets.wire_value(FacetDimension::Category),
            topic: self.facets.wire_value(FacetDimension::Topic),
            page,
        }
    }

    /// 开启新一代搜索，返回第 1 页的请求
    pub fn begin_search(&mut self) -> PendingPage {
        let ticket = self.pager.restart();
        PendingPage {
            ticket,
            query: self.build_query(ticket.page),
        }
    }

    /// 准备下一页请求，已有请求在途时拒绝
    pub fn begin_next(&mut self) -> AppResult<PendingPage> {
        let page = self.pager.cursor() + 1;
        let ticket = self.pager.load_page(page, LoadMode::Append)?;
        Ok(PendingPage {
            ticket,
            query: self.build_query(page),
        })
    }

    /// 凭票落地一页结果
    ///
    /// 过期的票据、已关闭的页面都不会改变状态；
    /// 当前代的请求失败时游标不变，错误原样返回
    pub fn apply(
        &mut self,
        ticket: PageTicket,
        result: AppResult<Vec<QuestionSummary>>,
    ) -> AppResult<BrowseOutcome> {
        if !self.scope.is_alive() {
            debug!("页面已关闭，丢弃第 {} 页结果", ticket.page);
            return Ok(BrowseOutcome::Discarded);
        }

        let page_items = match result {
            Ok(items) => items,
            Err(e) => {
                if self.pager.fail(ticket) {
                    warn!("[第 {} 页] ⚠️ 加载失败: {}", ticket.page, e);
                    return Err(e);
                }
                debug!("过期请求失败，忽略: {}", e);
                return Ok(BrowseOutcome::Discarded);
            }
        };

        // 先留一份本页数据用于重算筛选
        let fetched = if self.pager.is_current(&ticket) {
            page_items.clone()
        } else {
            Vec::new()
        };

        match self.pager.complete(ticket, page_items) {
            PageOutcome::Applied { added } => {
                self.facets.recompute(&fetched);
                let total = self.pager.items().len();
                info!(
                    "[第 {} 页] ✓ 新增 {} 道题，共 {} 道",
                    ticket.page, added, total
                );
                Ok(BrowseOutcome::Loaded { added, total })
            }
            PageOutcome::NoMore => {
                info!("[第 {} 页] 没有更多结果", ticket.page);
                Ok(BrowseOutcome::NoMore)
            }
            PageOutcome::Stale => Ok(BrowseOutcome::Discarded),
        }
    }

    async fn run_pending(&mut self, pending: PendingPage) -> AppResult<BrowseOutcome> {
        let backend = self.backend();
        let fetched = self.scope.run(fetch_page(backend.as_ref(), &pending)).await;
        match fetched {
            Ok(result) => self.apply(pending.ticket, result),
            Err(AppError::Business(BusinessError::Cancelled)) => Ok(BrowseOutcome::Discarded),
            Err(e) => Err(e),
        }
    }

    /// 按当前关键字和筛选从第 1 页重新搜索
    pub async fn search(&mut self) -> AppResult<BrowseOutcome> {
        let pending = self.begin_search();
        info!(
            "🔍 搜索 \"{}\" (第 {} 代)",
            pending.query.question_name, pending.ticket.generation
        );
        self.run_pending(pending).await
    }

    /// 加载下一页
    pub async fn load_next(&mut self) -> AppResult<BrowseOutcome> {
        let pending = self.begin_next()?;
        self.run_pending(pending).await
    }

    /// 防抖后的关键字到达
    ///
    /// 与当前关键字相同则不搜索，返回 None
    pub async fn on_query_settled(&mut self, text: String) -> AppResult<Option<BrowseOutcome>> {
        if text == self.query {
            debug!("关键字未变化，跳过搜索");
            return Ok(None);
        }
        self.query = text;
        self.search().await.map(Some)
    }

    /// 持续消费防抖后的关键字，直到输入端关闭或页面关闭
    ///
    /// 返回实际发起的搜索次数
    pub async fn drive_queries(&mut self, debouncer: &mut QueryDebouncer) -> usize {
        let mut searches = 0;
        loop {
            let settled = match self.scope.run(debouncer.next_settled()).await {
                Ok(Some(text)) => text,
                Ok(None) | Err(_) => break,
            };
            match self.on_query_settled(settled).await {
                Ok(Some(_)) => searches += 1,
                Ok(None) => {}
                Err(e) => {
                    searches += 1;
                    warn!("⚠️ 搜索失败: {}", e.user_message());
                }
            }
        }
        searches
    }

    /// 列表中 `current` 之后的题目
    ///
    /// 已到末尾且还有更多结果时先加载下一页
    pub async fn next_question_id(&mut self, current: i64) -> AppResult<Option<i64>> {
        let Some(pos) = self.position(current) else {
            return Ok(None);
        };
        if pos + 1 == self.items().len() && self.has_more() {
            self.load_next().await?;
        }
        Ok(self.items().get(pos + 1).map(|q| q.id))
    }

    /// 列表中 `current` 之前的题目
    pub fn prev_question_id(&self, current: i64) -> Option<i64> {
        let pos = self.position(current)?;
        pos.checked_sub(1)
            .and_then(|p| self.items().get(p))
            .map(|q| q.id)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items().iter().position(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::{summary, MockBackend};
    use crate::workflow::debounce;
    use std::time::Duration;

    fn browser(mock: &Arc<MockBackend>) -> QuestionBrowser {
        QuestionBrowser::new(mock.clone(), ScreenScope::new())
    }

    #[tokio::test]
    async fn search_then_load_next_appends_and_advances_cursor() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(vec![summary(1, "grade3", "natural science"), summary(2, "grade3", "natural science")]);
        mock.push_page(vec![summary(2, "grade3", "natural science"), summary(3, "grade4", "natural science")]);
        mock.push_page(Vec::new());
        let mut browser = browser(&mock);

        assert_eq!(
            browser.search().await.unwrap(),
            BrowseOutcome::Loaded { added: 2, total: 2 }
        );
        assert_eq!(
            browser.load_next().await.unwrap(),
            BrowseOutcome::Loaded { added: 1, total: 3 }
        );
        assert_eq!(browser.cursor(), 2);
        assert_eq!(browser.load_next().await.unwrap(), BrowseOutcome::NoMore);
        assert_eq!(browser.cursor(), 2);
        assert!(!browser.has_more());

        let pages: Vec<u32> = mock.search_queries().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn facets_follow_the_latest_page_only() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(vec![summary(1, "grade3", "natural science"), summary(2, "grade5", "social science")]);
        mock.push_page(vec![summary(3, "grade5", "social science")]);
        let mut browser = browser(&mock);

        browser.search().await.unwrap();
        assert!(browser
            .facets_mut()
            .apply_selection(FacetDimension::Grade, "grade3", true));

        browser.load_next().await.unwrap();
        assert_eq!(browser.facets().candidates(FacetDimension::Grade), ["grade5"]);
        assert!(browser.facets().selected(FacetDimension::Grade).is_empty());
    }

    #[tokio::test]
    async fn selections_are_sent_comma_joined() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(Vec::new());
        let mut browser = browser(&mock);
        browser.facets_mut().apply_selection(FacetDimension::Grade, "grade1", true);
        browser.facets_mut().apply_selection(FacetDimension::Grade, "grade2", true);
        browser.set_query("  mammal ");

        browser.search().await.unwrap();
        let sent = mock.search_queries();
        assert_eq!(sent[0].grade, "grade1,grade2");
        assert_eq!(sent[0].question_name, "mammal");
        assert_eq!(sent[0].page, 1);
    }

    #[tokio::test]
    async fn stale_generation_does_not_alter_newer_results() {
        let mock = Arc::new(MockBackend::new());
        let mut browser = browser(&mock);

        let g1 = browser.begin_search();
        let g2 = browser.begin_search();
        assert!(g2.ticket.generation > g1.ticket.generation);

        browser
            .apply(g2.ticket, Ok(vec![summary(20, "grade8", "social science")]))
            .unwrap();
        let candidates_before = browser.facets().clone();

        let outcome = browser
            .apply(g1.ticket, Ok(vec![summary(10, "grade1", "language science")]))
            .unwrap();
        assert_eq!(outcome, BrowseOutcome::Discarded);
        assert_eq!(browser.items().len(), 1);
        assert_eq!(browser.items()[0].id, 20);
        assert_eq!(browser.facets(), &candidates_before);

        // 过期请求的失败同样被忽略
        let failed = browser.apply(g1.ticket, Err(AppError::invalid_input("boom")));
        assert_eq!(failed.unwrap(), BrowseOutcome::Discarded);
    }

    #[tokio::test]
    async fn load_next_while_loading_is_rejected() {
        let mock = Arc::new(MockBackend::new());
        let mut browser = browser(&mock);
        let first = browser.begin_search();
        browser
            .apply(first.ticket, Ok(vec![summary(1, "grade1", "natural science")]))
            .unwrap();

        let _in_flight = browser.begin_next().unwrap();
        let err = browser.load_next().await.unwrap_err();
        assert!(matches!(err, AppError::Business(BusinessError::AlreadyLoading)));
        assert_eq!(mock.search_count(), 0);
    }

    #[tokio::test]
    async fn failed_page_keeps_cursor_and_can_be_retried() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(vec![summary(1, "grade1", "natural science")]);
        mock.push_search_error();
        mock.push_page(vec![summary(2, "grade1", "natural science")]);
        let mut browser = browser(&mock);

        browser.search().await.unwrap();
        assert!(browser.load_next().await.is_err());
        assert_eq!(browser.cursor(), 1);
        assert!(!browser.is_loading());

        browser.load_next().await.unwrap();
        assert_eq!(browser.cursor(), 2);
        let pages: Vec<u32> = mock.search_queries().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn closed_scope_discards_results() {
        let mock = Arc::new(MockBackend::new());
        let mut browser = browser(&mock);
        let pending = browser.begin_search();
        browser.scope().close();

        let outcome = browser
            .apply(pending.ticket, Ok(vec![summary(1, "grade1", "natural science")]))
            .unwrap();
        assert_eq!(outcome, BrowseOutcome::Discarded);
        assert!(browser.items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn three_quick_keystrokes_trigger_one_search() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(vec![summary(1, "grade2", "natural science")]);
        let mut browser = browser(&mock);
        let (input, mut debouncer) = debounce::from_config(&Config::default());

        tokio::spawn(async move {
            input.push("c");
            tokio::time::sleep(Duration::from_millis(100)).await;
            input.push("ce");
            tokio::time::sleep(Duration::from_millis(100)).await;
            input.push("cel");
            tokio::time::sleep(Duration::from_secs(2)).await;
            // 与当前关键字相同，不再搜索
            input.push("cel");
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let searches = browser.drive_queries(&mut debouncer).await;
        assert_eq!(searches, 1);
        let sent = mock.search_queries();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].question_name, "cel");
    }

    #[tokio::test]
    async fn navigation_loads_the_next_page_at_the_end() {
        let mock = Arc::new(MockBackend::new());
        mock.push_page(vec![summary(1, "grade1", "natural science"), summary(2, "grade1", "natural science")]);
        mock.push_page(vec![summary(3, "grade1", "natural science")]);
        let mut browser = browser(&mock);
        browser.search().await.unwrap();

        assert_eq!(browser.next_question_id(1).await.unwrap(), Some(2));
        assert_eq!(browser.next_question_id(2).await.unwrap(), Some(3));
        assert_eq!(browser.prev_question_id(3), Some(2));
        assert_eq!(browser.prev_question_id(1), None);
        assert_eq!(browser.next_question_id(99).await.unwrap(), None);
    }
}
