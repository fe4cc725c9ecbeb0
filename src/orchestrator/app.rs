//! 命令行驱动 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建后端客户端和本地存储，恢复或建立会话
//! 2. **题库浏览**：按当前筛选检索第一页
//! 3. **学习概况**：最近 7 天正确率、班级作业、班级公告
//! 4. **推荐练习**：触发推荐并逐个输出解析结果
//! 5. **全局统计**：汇总输出
//!
//! 单个步骤失败只记录日志，不中断后续步骤

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use futures::StreamExt;
use tracing::{info, warn};

use crate::clients::{Backend, HttpBackend};
use crate::config::Config;
use crate::infrastructure::{FileProgressStore, FileSessionStore, ScreenScope};
use crate::models::Session;
use crate::services::{AccountService, ClassService, DashboardService};
use crate::utils::{logging, truncate_text};
use crate::workflow::recommendation_poller::is_empty_result;
use crate::workflow::{QuestionBrowser, RecommendationPoller};

/// 应用主结构
pub struct App {
    config: Config,
    backend: Arc<dyn Backend>,
    account: AccountService,
    classes: ClassService,
    dashboard: DashboardService,
    session: Option<Session>,
}

/// 运行统计
#[derive(Debug, Default)]
struct RunStats {
    loaded: usize,
    recommended: usize,
    placeholders: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config)?);
        let sessions = Arc::new(FileSessionStore::new(&config.data_dir));
        let progress = Arc::new(FileProgressStore::new(&config.data_dir));

        let account = AccountService::new(Arc::clone(&backend), sessions);
        let classes = ClassService::new(Arc::clone(&backend), progress);
        let dashboard = DashboardService::new(Arc::clone(&backend));

        let session = Self::establish_session(&account, &config).await;
        logging::log_startup(
            &config.normalized_base_url(),
            session.as_ref().map(|s| s.user_name.as_str()),
        );

        Ok(Self {
            config,
            backend,
            account,
            classes,
            dashboard,
            session,
        })
    }

    /// 优先恢复已保存的会话，否则用配置中的账号登录
    async fn establish_session(account: &AccountService, config: &Config) -> Option<Session> {
        match account.restore().await {
            Ok(Some(session)) => return Some(session),
            Ok(None) => {}
            Err(e) => warn!("⚠️ 读取本地会话失败: {}", e),
        }

        let (email, password) = match (&config.login_email, &config.login_password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                info!("💡 未配置 LOGIN_EMAIL / LOGIN_PASSWORD，以未登录状态运行");
                return None;
            }
        };

        match account.login(email, password).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("⚠️ 登录失败: {}", e.user_message());
                None
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let scope = ScreenScope::new();
        let mut stats = RunStats::default();

        stats.loaded = self.browse_first_page(&scope).await;

        if self.session.is_some() {
            self.show_dashboard().await;
            self.show_assignments().await;
            self.show_announcements().await;
            let (recommended, placeholders) = self.show_recommendations(&scope).await;
            stats.recommended = recommended;
            stats.placeholders = placeholders;
        } else {
            warn!("⚠️ 未登录，跳过学习概况和推荐");
        }

        scope.close();
        logging::print_final_stats(stats.loaded, stats.recommended, stats.placeholders);
        Ok(())
    }

    async fn browse_first_page(&self, scope: &ScreenScope) -> usize {
        info!("\n📚 正在检索题库第一页...");
        let mut browser = QuestionBrowser::new(Arc::clone(&self.backend), scope.clone());
        if let Err(e) = browser.search().await {
            warn!("⚠️ 题库检索失败: {}", e.user_message());
            return 0;
        }

        for question in browser.items().iter().take(5) {
            info!(
                "  #{} {} [{}]",
                question.id,
                truncate_text(&question.title, 40),
                question.subject.as_deref().unwrap_or("-")
            );
        }
        browser.items().len()
    }

    async fn show_dashboard(&self) {
        match self.dashboard.window(7).await {
            Ok(rates) if rates.is_empty() => info!("📈 暂无正确率记录"),
            Ok(rates) => info!("📈 最近 {} 天正确率: {:?}", rates.len(), rates),
            Err(e) => warn!("⚠️ 获取正确率失败: {}", e.user_message()),
        }
    }

    async fn show_assignments(&self) {
        let classes = match self.classes.my_classes().await {
            Ok(classes) => classes,
            Err(e) => {
                warn!("⚠️ 获取班级失败: {}", e.user_message());
                return;
            }
        };

        let now = Local::now().naive_local();
        for class in classes.iter().take(3) {
            match self.classes.class_assignments(class.class_id, now).await {
                Ok(views) => {
                    let open = views.iter().filter(|v| v.status.is_open()).count();
                    info!("🏫 {}: {} 份作业，{} 份可作答", class.class_name, views.len(), open);
                    for view in views.iter().take(5) {
                        info!(
                            "  📝 {} [{}] 截止 {}",
                            truncate_text(&view.assignment.assignment_name, 30),
                            view.status.label(),
                            view.assignment.due_text()
                        );
                    }
                }
                Err(e) => warn!("⚠️ [{}] 获取作业失败: {}", class.class_name, e.user_message()),
            }
        }
    }

    async fn show_announcements(&self) {
        match self.classes.all_announcements().await {
            Ok(list) => {
                for item in list.iter().take(3) {
                    info!(
                        "📢 [{}] {} {}",
                        item.class_name.as_deref().unwrap_or("-"),
                        item.display_time(),
                        truncate_text(&item.title, 40)
                    );
                }
            }
            Err(e) => warn!("⚠️ 获取公告失败: {}", e.user_message()),
        }
    }

    async fn show_recommendations(&self, scope: &ScreenScope) -> (usize, usize) {
        let mut poller = RecommendationPoller::new(Arc::clone(&self.backend), scope.clone(), &self.config);

        let stream = match poller.refresh_and_resolve().await {
            Ok(stream) => stream,
            Err(e) if is_empty_result(&e) => {
                info!("💡 {}", e.user_message());
                return (0, 0);
            }
            Err(e) => {
                warn!("⚠️ 获取推荐失败: {}", e.user_message());
                return (0, 0);
            }
        };

        let mut stream = Box::pin(stream);
        let (mut total, mut placeholders) = (0, 0);
        while let Some(item) = stream.next().await {
            total += 1;
            if item.placeholder {
                placeholders += 1;
            }
            info!("✅ 推荐 #{}: {}", item.id, truncate_text(&item.title, 40));
        }
        (total, placeholders)
    }

    /// 退出登录
    pub async fn logout(&self) -> Result<()> {
        self.account.logout().await?;
        Ok(())
    }
}
