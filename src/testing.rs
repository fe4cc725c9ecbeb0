//! 测试用的脚本化后端
//!
//! 按预设脚本返回结果，并记录每类调用，供各模块的单元测试共用

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::clients::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{
    Announcement, AssignmentQuestion, ClassDetail, JoinMode, JoinOutcome, LoginReply,
    QuestionDetail, QuestionSummary, RegisterReply, RegisterRequest, SearchQuery, StudentClass,
};

fn transport_error(endpoint: &str) -> AppError {
    AppError::api_request_failed(
        endpoint,
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "mock backend"),
    )
}

#[derive(Default)]
struct State {
    // 题库
    pages: VecDeque<Option<Vec<QuestionSummary>>>,
    search_queries: Vec<SearchQuery>,
    details: HashMap<i64, QuestionDetail>,
    failing_details: HashSet<i64>,
    detail_requests: Vec<i64>,
    submit_fails: bool,
    submitted: Vec<(i64, bool, usize)>,
    finish_results: VecDeque<bool>,
    finish_calls: Vec<(i64, bool, f64)>,
    // 推荐
    trigger_fails: bool,
    recommend_batches: VecDeque<Vec<i64>>,
    recommend_polls: usize,
    // 账号
    login_reply: Option<LoginReply>,
    register_reply: Option<RegisterReply>,
    token: Option<String>,
    credentials_cleared: usize,
    // Dashboard / 班级
    accuracy_rates: Vec<f64>,
    classes: Vec<StudentClass>,
    announcements: HashMap<i64, Vec<Announcement>>,
    failing_announcements: HashSet<i64>,
    class_detail: ClassDetail,
    join_outcome: Option<JoinOutcome>,
    total_calls: usize,
}

/// 脚本化后端
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<State>,
    details_in_flight: AtomicUsize,
    max_details_in_flight: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// 记一次网络调用并取得状态
    fn call(&self) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.total_calls += 1;
        state
    }

    // ====== 脚本 ======

    /// 下一次检索返回这一页；脚本用完后返回空页
    pub fn push_page(&self, items: Vec<QuestionSummary>) {
        self.state().pages.push_back(Some(items));
    }

    pub fn push_search_error(&self) {
        self.state().pages.push_back(None);
    }

    pub fn set_detail(&self, detail: QuestionDetail) {
        let id = detail.id.unwrap_or_default();
        self.state().details.insert(id, detail);
    }

    pub fn fail_detail(&self, id: i64) {
        self.state().failing_details.insert(id);
    }

    pub fn set_submit_ok(&self, ok: bool) {
        self.state().submit_fails = !ok;
    }

    /// 下一次完成提交的结果；脚本用完后一律成功
    pub fn push_finish_result(&self, ok: bool) {
        self.state().finish_results.push_back(ok);
    }

    pub fn set_trigger_ok(&self, ok: bool) {
        self.state().trigger_fails = !ok;
    }

    /// 下一次轮询返回这批 id；脚本用完后返回空批
    pub fn push_recommend_batch(&self, ids: Vec<i64>) {
        self.state().recommend_batches.push_back(ids);
    }

    pub fn set_login_reply(&self, reply: LoginReply) {
        self.state().login_reply = Some(reply);
    }

    pub fn set_register_reply(&self, reply: RegisterReply) {
        self.state().register_reply = Some(reply);
    }

    pub fn set_accuracy_rates(&self, rates: Vec<f64>) {
        self.state().accuracy_rates = rates;
    }

    pub fn set_classes(&self, classes: Vec<StudentClass>) {
        self.state().classes = classes;
    }

    pub fn set_announcements(&self, class_id: i64, list: Vec<Announcement>) {
        self.state().announcements.insert(class_id, list);
    }

    pub fn fail_announcements(&self, class_id: i64) {
        self.state().failing_announcements.insert(class_id);
    }

    pub fn set_class_detail(&self, detail: ClassDetail) {
        self.state().class_detail = detail;
    }

    pub fn set_join_outcome(&self, outcome: JoinOutcome) {
        self.state().join_outcome = Some(outcome);
    }

    // ====== 记录 ======

    pub fn total_calls(&self) -> usize {
        self.state().total_calls
    }

    pub fn search_queries(&self) -> Vec<SearchQuery> {
        self.state().search_queries.clone()
    }

    pub fn search_count(&self) -> usize {
        self.state().search_queries.len()
    }

    pub fn detail_requests(&self) -> Vec<i64> {
        self.state().detail_requests.clone()
    }

    pub fn max_concurrent_details(&self) -> usize {
        self.max_details_in_flight.load(Ordering::SeqCst)
    }

    pub fn submitted_answers(&self) -> Vec<(i64, bool, usize)> {
        self.state().submitted.clone()
    }

    pub fn finish_calls(&self) -> Vec<(i64, bool, f64)> {
        self.state().finish_calls.clone()
    }

    pub fn recommend_poll_count(&self) -> usize {
        self.state().recommend_polls
    }

    pub fn auth_token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn credentials_cleared(&self) -> usize {
        self.state().credentials_cleared
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn search_questions(&self, query: &SearchQuery) -> AppResult<Vec<QuestionSummary>> {
        let mut state = self.call();
        state.search_queries.push(query.clone());
        match state.pages.pop_front() {
            Some(Some(items)) => Ok(items),
            Some(None) => Err(transport_error("viewQuestion")),
            None => Ok(Vec::new()),
        }
    }

    async fn question_detail(&self, id: i64) -> AppResult<QuestionDetail> {
        {
            let mut state = self.call();
            state.detail_requests.push(id);
        }

        let now = self.details_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_details_in_flight.fetch_max(now, Ordering::SeqCst);
        // 让出执行权，使并发请求能够交错
        tokio::task::yield_now().await;
        self.details_in_flight.fetch_sub(1, Ordering::SeqCst);

        let state = self.state();
        if state.failing_details.contains(&id) {
            return Err(transport_error("doquestion"));
        }
        state
            .details
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::bad_response("doquestion", Some(0), Some("题目不存在".to_string())))
    }

    async fn submit_answer(&self, id: i64, is_correct: bool, choice: usize) -> AppResult<()> {
        let mut state = self.call();
        state.submitted.push((id, is_correct, choice));
        if state.submit_fails {
            return Err(transport_error("answerQuestion"));
        }
        Ok(())
    }

    async fn finish_assignment(&self, assignment_id: i64, completed: bool, accuracy: f64) -> AppResult<()> {
        let mut state = self.call();
        state.finish_calls.push((assignment_id, completed, accuracy));
        match state.finish_results.pop_front() {
            Some(false) => Err(AppError::bad_response("finishAssignment", Some(0), Some("提交失败".to_string()))),
            _ => Ok(()),
        }
    }

    async fn trigger_recommendation(&self) -> AppResult<()> {
        let state = self.call();
        if state.trigger_fails {
            return Err(AppError::bad_response("recommend", Some(0), None));
        }
        Ok(())
    }

    async fn recommendation_ids(&self) -> AppResult<Vec<i64>> {
        let mut state = self.call();
        state.recommend_polls += 1;
        Ok(state.recommend_batches.pop_front().unwrap_or_default())
    }

    async fn login(&self, _email: &str, _password: &str) -> AppResult<LoginReply> {
        let state = self.call();
        state
            .login_reply
            .clone()
            .ok_or_else(|| transport_error("login"))
    }

    async fn register(&self, _request: &RegisterRequest) -> AppResult<RegisterReply> {
        let state = self.call();
        state
            .register_reply
            .clone()
            .ok_or_else(|| transport_error("register"))
    }

    fn set_auth_token(&self, token: Option<String>) {
        self.state().token = token;
    }

    fn clear_credentials(&self) -> AppResult<()> {
        let mut state = self.state();
        state.token = None;
        state.credentials_cleared += 1;
        Ok(())
    }

    async fn accuracy_rates(&self) -> AppResult<Vec<f64>> {
        Ok(self.call().accuracy_rates.clone())
    }

    async fn view_classes(&self) -> AppResult<Vec<StudentClass>> {
        Ok(self.call().classes.clone())
    }

    async fn join_class(&self, _mode: JoinMode, _key: &str) -> AppResult<JoinOutcome> {
        let state = self.call();
        Ok(state.join_outcome.clone().unwrap_or(JoinOutcome::Joined {
            message: "Joined successfully".to_string(),
        }))
    }

    async fn leave_class(&self, _class_id: i64) -> AppResult<()> {
        drop(self.call());
        Ok(())
    }

    async fn class_detail(&self, _class_id: i64) -> AppResult<ClassDetail> {
        Ok(self.call().class_detail.clone())
    }

    async fn assignment_questions(&self, _assignment_id: i64) -> AppResult<Vec<AssignmentQuestion>> {
        drop(self.call());
        Ok(Vec::new())
    }

    async fn announcements(&self, class_id: i64) -> AppResult<Vec<Announcement>> {
        let state = self.call();
        if state.failing_announcements.contains(&class_id) {
            return Err(transport_error("selectAnnouncement"));
        }
        Ok(state.announcements.get(&class_id).cloned().unwrap_or_default())
    }

    async fn check_announcement(&self, _announcement_id: i64) -> AppResult<()> {
        drop(self.call());
        Ok(())
    }
}

// ====== 测试数据 ======

pub fn summary(id: i64, grade: &str, subject: &str) -> QuestionSummary {
    QuestionSummary {
        id,
        title: format!("Question {}", id),
        grade: Some(grade.to_string()),
        subject: Some(subject.to_string()),
        category: None,
        topic: None,
        question_index: None,
    }
}

pub fn detail(id: i64, choices: &[&str], answer: i64) -> QuestionDetail {
    QuestionDetail {
        id: Some(id),
        question: Some(format!("Question {}", id)),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        answer,
        image: None,
    }
}

pub fn student_login(user_id: i64, name: &str, token: Option<&str>) -> LoginReply {
    LoginReply {
        status: Some("ok".to_string()),
        current_authority: Some("student".to_string()),
        user_id: Some(user_id),
        user_name: Some(name.to_string()),
        token: token.map(str::to_string),
        ..Default::default()
    }
}

pub fn class(class_id: i64, name: &str) -> StudentClass {
    StudentClass {
        class_id,
        class_name: name.to_string(),
        description: None,
    }
}

pub fn announcement(title: &str, create_time: &[i32]) -> Announcement {
    Announcement {
        id: None,
        title: title.to_string(),
        content: String::new(),
        create_time: create_time.to_vec(),
        class_id: None,
        class_name: None,
    }
}
