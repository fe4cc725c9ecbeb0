/// 学生端 REST 客户端
///
/// 封装所有与后端 `/student/` 接口相关的调用逻辑：
/// - 固定根路径 + 相对端点
/// - cookie 自动保存与携带
/// - 统一请求头，登录后附带 `Authorization: Bearer <token>`
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::clients::backend::Backend;
use crate::clients::envelope::{self, DashboardData, Envelope, ListData, SearchReply};
use crate::config::Config;
use crate::error::{AppError, AppResult, StoreError};
use crate::models::{
    Announcement, AssignmentQuestion, ClassDetail, JoinMode, JoinOutcome, LoginReply,
    QuestionDetail, QuestionSummary, RegisterReply, RegisterRequest, SearchQuery, StudentClass,
};
use crate::utils::truncate_text;

const USER_AGENT: &str = "ADProject/1.0 (Rust)";

/// HTTP 后端
pub struct HttpBackend {
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    client: RwLock<Client>,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Self::build_client(connect_timeout, request_timeout)?;

        Ok(Self {
            base_url: config.normalized_base_url(),
            connect_timeout,
            request_timeout,
            client: RwLock::new(client),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 构建带 cookie 存储的客户端，重建即清空 cookie
    fn build_client(connect_timeout: Duration, request_timeout: Duration) -> AppResult<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::api_request_failed("client/build", e))
    }

    fn client(&self) -> AppResult<Client> {
        self.client
            .read()
            .map(|c| c.clone())
            .map_err(|e| StoreError::Poisoned(e.to_string()).into())
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// 发送请求并把响应体解析为 `T`
    ///
    /// # 参数
    /// - `method`: HTTP 方法
    /// - `endpoint`: 相对于根路径的端点，如 `viewQuestion`
    /// - `query`: 查询参数
    /// - `body`: JSON 请求体（可选）
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("请求 {} {} 参数: {:?}", method, url, query);

        let mut request = self.client()?.request(method, &url).query(query);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!("响应 {} [{}]: {}", endpoint, status, truncate_text(&text, 300));

        if !status.is_success() {
            return Err(AppError::bad_response(
                endpoint,
                Some(i64::from(status.as_u16())),
                Some(truncate_text(&text, 200)),
            ));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> AppResult<T> {
        self.call(Method::GET, endpoint, query, None).await
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> AppResult<T> {
        self.call(Method::POST, endpoint, query, None).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn search_questions(&self, query: &SearchQuery) -> AppResult<Vec<QuestionSummary>> {
        let params = [
            ("keyword", String::new()),
            ("questionName", query.question_name.clone()),
            ("grade", query.grade.clone()),
            ("subject", query.subject.clone()),
            ("topic", query.topic.clone()),
            ("category", query.category.clone()),
            ("page", query.page.to_string()),
            ("questionIndex", "-1".to_string()),
        ];
        let reply: SearchReply = self.get("viewQuestion", &params).await?;
        reply.into_items("viewQuestion")
    }

    async fn question_detail(&self, id: i64) -> AppResult<QuestionDetail> {
        let env: Envelope<QuestionDetail> = self.get("doquestion", &[("id", id.to_string())]).await?;
        let mut detail = env.into_data("doquestion")?;
        detail.id.get_or_insert(id);
        Ok(detail)
    }

    async fn submit_answer(&self, id: i64, is_correct: bool, choice: usize) -> AppResult<()> {
        let params = [
            ("id", id.to_string()),
            ("correct", if is_correct { "1" } else { "0" }.to_string()),
            ("param", choice.to_string()),
        ];
        let env: Envelope<Value> = self.get("answerQuestion", &params).await?;
        env.ensure_ok("answerQuestion")
    }

    async fn finish_assignment(&self, assignment_id: i64, completed: bool, accuracy: f64) -> AppResult<()> {
        let params = [
            ("assignmentId", assignment_id.to_string()),
            ("whether", if completed { "1" } else { "0" }.to_string()),
            ("accuracy", accuracy.to_string()),
        ];
        let env: Envelope<Value> = self.post("finishAssignment", &params).await?;
        env.ensure_ok("finishAssignment")
    }

    async fn trigger_recommendation(&self) -> AppResult<()> {
        let env: Envelope<Value> = self.call(Method::PUT, "recommend", &[], None).await?;
        env.ensure_ok("recommend")
    }

    async fn recommendation_ids(&self) -> AppResult<Vec<i64>> {
        let env: Envelope<Value> = self.get("getRecommend", &[]).await?;
        let data = env.into_data("getRecommend")?;
        Ok(envelope::extract_recommend_ids(&data))
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginReply> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.call(Method::POST, "login", &[], Some(body)).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterReply> {
        let body = serde_json::to_value(request)?;
        self.call(Method::POST, "register", &[], Some(body)).await
    }

    fn set_auth_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn clear_credentials(&self) -> AppResult<()> {
        let fresh = Self::build_client(self.connect_timeout, self.request_timeout)?;
        *self
            .client
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))? = fresh;
        self.set_auth_token(None);
        Ok(())
    }

    async fn accuracy_rates(&self) -> AppResult<Vec<f64>> {
        let env: Envelope<DashboardData> = self.get("dashboard", &[]).await?;
        Ok(env.into_data("dashboard")?.accuracy_rates)
    }

    async fn view_classes(&self) -> AppResult<Vec<StudentClass>> {
        let env: Envelope<ListData<StudentClass>> = self.get("viewClass", &[]).await?;
        Ok(env.into_data("viewClass")?.list)
    }

    async fn join_class(&self, mode: JoinMode, key: &str) -> AppResult<JoinOutcome> {
        let params = [
            ("accessType", mode.access_type().to_string()),
            ("key", key.to_string()),
        ];
        let env: Envelope<Value> = self.post("joinClass", &params).await?;
        match env.code {
            Some(1) => Ok(JoinOutcome::Joined {
                message: env.msg.unwrap_or_else(|| "Joined successfully".to_string()),
            }),
            Some(0) => Ok(JoinOutcome::AlreadyMember {
                message: env.msg.unwrap_or_else(|| "Already in this class".to_string()),
            }),
            code => Err(AppError::bad_response(
                "joinClass",
                code,
                Some(env.msg.unwrap_or_else(|| "Join failed".to_string())),
            )),
        }
    }

    async fn leave_class(&self, class_id: i64) -> AppResult<()> {
        let env: Envelope<Value> = self.post("leaveClass", &[("classId", class_id.to_string())]).await?;
        env.ensure_ok("leaveClass")
    }

    async fn class_detail(&self, class_id: i64) -> AppResult<ClassDetail> {
        let env: Envelope<ClassDetail> = self.get("selectClass", &[("classId", class_id.to_string())]).await?;
        env.into_data("selectClass")
    }

    async fn assignment_questions(&self, assignment_id: i64) -> AppResult<Vec<AssignmentQuestion>> {
        let env: Envelope<ListData<AssignmentQuestion>> = self
            .get("selectAssignment", &[("assignmentId", assignment_id.to_string())])
            .await?;
        Ok(env.into_data("selectAssignment")?.list)
    }

    async fn announcements(&self, class_id: i64) -> AppResult<Vec<Announcement>> {
        let env: Envelope<ListData<Announcement>> = self
            .get("selectAnnouncement", &[("classId", class_id.to_string())])
            .await?;
        Ok(env.into_data("selectAnnouncement")?.list)
    }

    async fn check_announcement(&self, announcement_id: i64) -> AppResult<()> {
        let env: Envelope<Value> = self
            .post("checkAnnouncement", &[("announcementId", announcement_id.to_string())])
            .await?;
        env.ensure_ok("checkAnnouncement")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9/student".to_string(),
            ..Config::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:9/student/");
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let backend = HttpBackend::new(&Config::default()).unwrap();
        backend.set_auth_token(Some("abc".to_string()));
        assert_eq!(backend.current_token().as_deref(), Some("abc"));
        backend.clear_credentials().unwrap();
        assert_eq!(backend.current_token(), None);
    }

    #[tokio::test]
    #[ignore] // 需要本地后端：cargo test -- --ignored
    async fn live_search_first_page() {
        let backend = HttpBackend::new(&Config::from_env()).unwrap();
        let query = SearchQuery {
            page: 1,
            ..SearchQuery::default()
        };
        let items = backend.search_questions(&query).await;
        assert!(items.is_ok(), "应该能够检索第一页题目");
    }
}
