//! 分页控制 - 流程层
//!
//! `Idle → Loading → Idle`，同一时刻至多一个请求在途。
//! 每次发起请求都会拿到一张 [`PageTicket`]，结果回来时凭票落地；
//! 票据的代数落后于当前代数时结果直接丢弃。

use std::collections::HashSet;

use tracing::debug;

use crate::error::{AppError, AppResult, BusinessError};
use crate::models::Identified;

/// 加载方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// 替换现有列表（新搜索）
    Replace,
    /// 追加到列表末尾（下一页）
    Append,
}

/// 一次在途请求的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: u32,
    pub mode: LoadMode,
}

/// 请求结果落地后的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// 新增了 `added` 条记录
    Applied { added: usize },
    /// 空页，没有更多结果
    NoMore,
    /// 票据已过期，结果被丢弃
    Stale,
}

/// 分页控制器
#[derive(Debug)]
pub struct PaginationController<T> {
    items: Vec<T>,
    ids: HashSet<i64>,
    /// 最近一次成功加载的页码，0 表示还没有加载过
    cursor: u32,
    generation: u64,
    loading: bool,
    has_more: bool,
}

impl<T: Identified> Default for PaginationController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> PaginationController<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
            cursor: 0,
            generation: 0,
            loading: false,
            has_more: true,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// 开始加载某一页
    ///
    /// 已有请求在途时拒绝，不改变任何状态
    pub fn load_page(&mut self, page: u32, mode: LoadMode) -> AppResult<PageTicket> {
        if self.loading {
            debug!("⏳ 第 {} 页请求被拒绝：已有请求在途", page);
            return Err(AppError::Business(BusinessError::AlreadyLoading));
        }
        self.loading = true;
        Ok(PageTicket {
            generation: self.generation,
            page,
            mode,
        })
    }

    /// 开启新一代搜索
    ///
    /// 旧代的在途请求作废；新请求不受旧请求的在途标记阻塞。
    /// 返回第 1 页的 Replace 票据。
    pub fn restart(&mut self) -> PageTicket {
        self.generation += 1;
        self.loading = true;
        self.has_more = true;
        self.cursor = 0;
        debug!("🔄 开启第 {} 代搜索", self.generation);
        PageTicket {
            generation: self.generation,
            page: 1,
            mode: LoadMode::Replace,
        }
    }

    pub fn is_current(&self, ticket: &PageTicket) -> bool {
        ticket.generation == self.generation
    }

    /// 请求成功
    pub fn complete(&mut self, ticket: PageTicket, page_items: Vec<T>) -> PageOutcome {
        if !self.is_current(&ticket) {
            debug!(
                "🗑️ 丢弃过期结果: 第 {} 代第 {} 页 (当前第 {} 代)",
                ticket.generation, ticket.page, self.generation
            );
            return PageOutcome::Stale;
        }
        self.loading = false;

        if page_items.is_empty() {
            self.has_more = false;
            if ticket.mode == LoadMode::Replace {
                self.items.clear();
                self.ids.clear();
            }
            return PageOutcome::NoMore;
        }

        if ticket.mode == LoadMode::Replace {
            self.items.clear();
            self.ids.clear();
        }

        let mut added = 0;
        for item in page_items {
            if self.ids.insert(item.id()) {
                self.items.push(item);
                added += 1;
            }
        }
        self.cursor = ticket.page;
        PageOutcome::Applied { added }
    }

    /// 请求失败：游标不变，清除在途标记以便重试
    ///
    /// 返回票据是否仍属于当前代
    pub fn fail(&mut self, ticket: PageTicket) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.loading = false;
        true
    }
}
