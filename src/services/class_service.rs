/// 班级服务
///
/// 负责班级的加入/退出、作业列表（含状态）、作业题目和公告
use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::future::join_all;
use tracing::{info, warn};

use crate::clients::Backend;
use crate::error::{AppError, AppResult};
use crate::infrastructure::ProgressStore;
use crate::models::{
    Announcement, AssignmentQuestion, AssignmentStatus, ClassAssignment, JoinMode, JoinOutcome,
    StudentClass,
};

/// 作业及其推导出的状态
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentView {
    pub assignment: ClassAssignment,
    pub status: AssignmentStatus,
}

pub struct ClassService {
    backend: Arc<dyn Backend>,
    progress: Arc<dyn ProgressStore>,
}

impl ClassService {
    pub fn new(backend: Arc<dyn Backend>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { backend, progress }
    }

    /// 已加入的班级
    pub async fn my_classes(&self) -> AppResult<Vec<StudentClass>> {
        self.backend.view_classes().await
    }

    /// 按班级名或邀请 token 加入班级
    pub async fn join_class(&self, mode: JoinMode, key: &str) -> AppResult<JoinOutcome> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::invalid_input(match mode {
                JoinMode::ByName => "请输入班级名称",
                JoinMode::ByLink => "请输入邀请 token",
            }));
        }
        let outcome = self.backend.join_class(mode, key).await?;
        info!("🏫 加入班级 {} ({:?}): {:?}", key, mode, outcome);
        Ok(outcome)
    }

    pub async fn leave_class(&self, class_id: i64) -> AppResult<()> {
        self.backend.leave_class(class_id).await?;
        info!("🏫 已退出班级 {}", class_id);
        Ok(())
    }

    /// 班级作业列表，结合本地进度推导状态
    pub async fn class_assignments(
        &self,
        class_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Vec<AssignmentView>> {
        let detail = self.backend.class_detail(class_id).await?;
        let mut views = Vec::with_capacity(detail.list.len());
        for assignment in detail.list {
            let progress = match self.progress.load(assignment.assignment_id).await {
                Ok(progress) => progress,
                Err(e) => {
                    warn!(
                        "[作业 {}] ⚠️ 本地进度读取失败，按未开始处理: {}",
                        assignment.assignment_id, e
                    );
                    Default::default()
                }
            };
            let status = assignment.status(&progress, now);
            views.push(AssignmentView { assignment, status });
        }
        Ok(views)
    }

    pub async fn assignment_questions(&self, assignment_id: i64) -> AppResult<Vec<AssignmentQuestion>> {
        self.backend.assignment_questions(assignment_id).await
    }

    /// 单个班级的公告
    pub async fn announcements(&self, class_id: i64) -> AppResult<Vec<Announcement>> {
        self.backend.announcements(class_id).await
    }

    /// 所有班级的公告，按时间倒序合并
    ///
    /// 各班级并发拉取，单个班级失败只影响该班级
    pub async fn all_announcements(&self) -> AppResult<Vec<Announcement>> {
        let classes = self.backend.view_classes().await?;

        let fetches = classes.iter().map(|class| {
            let backend = Arc::clone(&self.backend);
            async move {
                match backend.announcements(class.class_id).await {
                    Ok(list) => list.into_iter().map(|a| a.tagged(class)).collect::<Vec<_>>(),
                    Err(e) => {
                        warn!("[班级 {}] ⚠️ 公告拉取失败: {}", class.class_name, e);
                        Vec::new()
                    }
                }
            }
        });

        let mut merged: Vec<Announcement> = join_all(fetches).await.into_iter().flatten().collect();
        // create_time 是 [y, M, d, H, m] 数组，按字典序比较即时间先后
        merged.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        info!("📢 共 {} 个班级、{} 条公告", classes.len(), merged.len());
        Ok(merged)
    }

    /// 标记公告已读
    pub async fn check_announcement(&self, announcement_id: i64) -> AppResult<()> {
        self.backend.check_announcement(announcement_id).await
    }
}
