//! 后端接口抽象
//!
//! 所有业务组件只依赖这个 trait，具体的 HTTP 实现见 [`super::HttpBackend`]。
//! 网络失败和后端业务失败都通过 `Err` 返回，调用方统一视为"这次调用没有成功"。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    Announcement, AssignmentQuestion, ClassDetail, JoinMode, JoinOutcome, LoginReply,
    QuestionDetail, QuestionSummary, RegisterReply, RegisterRequest, SearchQuery, StudentClass,
};

#[async_trait]
pub trait Backend: Send + Sync {
    // ====== 题库 ======

    /// 按筛选条件检索一页题目
    async fn search_questions(&self, query: &SearchQuery) -> AppResult<Vec<QuestionSummary>>;

    /// 题目详情（含正确答案下标）
    async fn question_detail(&self, id: i64) -> AppResult<QuestionDetail>;

    /// 上报单题作答结果
    async fn submit_answer(&self, id: i64, is_correct: bool, choice: usize) -> AppResult<()>;

    /// 上报作业完成情况
    async fn finish_assignment(
        &self,
        assignment_id: i64,
        completed: bool,
        accuracy: f64,
    ) -> AppResult<()>;

    // ====== 推荐 ======

    /// 触发服务端生成推荐
    async fn trigger_recommendation(&self) -> AppResult<()>;

    /// 拉取当前推荐的题目 id
    async fn recommendation_ids(&self) -> AppResult<Vec<i64>>;

    // ====== 账号 ======

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginReply>;

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterReply>;

    /// 设置或清除鉴权 token
    fn set_auth_token(&self, token: Option<String>);

    /// 清空 cookie 和 token
    fn clear_credentials(&self) -> AppResult<()>;

    // ====== Dashboard ======

    /// 历史正确率，取值 [0, 1]，按时间先后排列
    async fn accuracy_rates(&self) -> AppResult<Vec<f64>>;

    // ====== 班级 & 公告 ======

    async fn view_classes(&self) -> AppResult<Vec<StudentClass>>;

    async fn join_class(&self, mode: JoinMode, key: &str) -> AppResult<JoinOutcome>;

    async fn leave_class(&self, class_id: i64) -> AppResult<()>;

    async fn class_detail(&self, class_id: i64) -> AppResult<ClassDetail>;

    async fn assignment_questions(&self, assignment_id: i64) -> AppResult<Vec<AssignmentQuestion>>;

    async fn announcements(&self, class_id: i64) -> AppResult<Vec<Announcement>>;

    async fn check_announcement(&self, announcement_id: i64) -> AppResult<()>;
}
