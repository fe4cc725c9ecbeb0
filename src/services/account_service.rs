/// 账号服务
///
/// 负责登录、注册（成功后自动登录）、退出登录。
/// 登录态通过 [`SessionStore`] 持久化，token 同步给后端客户端。
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{info, warn};

use crate::clients::Backend;
use crate::error::{AppError, AppResult, BusinessError};
use crate::infrastructure::SessionStore;
use crate::models::{LoginReply, RegisterRequest, Session};

/// 注册成功码
const REGISTER_OK: i64 = 5;

/// 后端拦截未登录请求时 msg 中的关键字
const SESSION_EXPIRED_HINTS: [&str; 2] = ["未登录", "会话已失效"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("邮箱正则无效"));

pub struct AccountService {
    backend: Arc<dyn Backend>,
    sessions: Arc<dyn SessionStore>,
}

impl AccountService {
    pub fn new(backend: Arc<dyn Backend>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { backend, sessions }
    }

    /// 当前会话，未登录为 None
    pub async fn current_session(&self) -> AppResult<Option<Session>> {
        self.sessions.load().await
    }

    /// 启动时恢复会话，把已保存的 token 交给后端客户端
    pub async fn restore(&self) -> AppResult<Option<Session>> {
        let session = self.sessions.load().await?;
        if let Some(s) = &session {
            self.backend.set_auth_token(s.token.clone());
            info!("👤 已恢复会话: {}", s.user_name);
        }
        Ok(session)
    }

    /// 登录
    ///
    /// 只有学生账号且后端返回 ok 才算成功
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim();
        let password = password.trim();
        validate_credentials(email, password)?;

        let reply = self.backend.login(email, password).await?;
        let session = self.accept_login(reply, email, None, "登录失败")?;
        self.sessions.save(&session).await?;
        info!("✓ 登录成功: {} ({})", session.user_name, session.email);
        Ok(session)
    }

    /// 注册，成功后自动登录
    pub async fn register(&self, request: RegisterRequest) -> AppResult<Session> {
        let request = RegisterRequest {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password: request.password.trim().to_string(),
            ..request
        };
        if request.name.is_empty() {
            return Err(AppError::invalid_input("请输入用户名"));
        }
        validate_credentials(&request.email, &request.password)?;

        let reply = self.backend.register(&request).await?;
        if reply.code == 0 {
            if let Some(msg) = reply
                .msg
                .as_deref()
                .filter(|m| SESSION_EXPIRED_HINTS.iter().any(|hint| m.contains(hint)))
            {
                return Err(BusinessError::SessionExpired {
                    message: msg.to_string(),
                }
                .into());
            }
        }
        if reply.code != REGISTER_OK {
            return Err(AppError::bad_response(
                "register",
                Some(reply.code),
                Some(reply.msg.unwrap_or_else(|| "注册失败".to_string())),
            ));
        }
        info!("✓ 注册成功: {}，自动登录中...", request.email);

        let login = self.backend.login(&request.email, &request.password).await?;
        let session = self.accept_login(login, &request.email, Some(request.name.as_str()), "已注册，但登录失败")?;
        self.sessions.save(&session).await?;
        Ok(session)
    }

    /// 退出登录：清除会话、cookie 和 token
    pub async fn logout(&self) -> AppResult<()> {
        self.sessions.clear().await?;
        self.backend.clear_credentials()?;
        info!("👋 已退出登录");
        Ok(())
    }

    fn accept_login(
        &self,
        reply: LoginReply,
        email: &str,
        fallback_name: Option<&str>,
        fallback_message: &str,
    ) -> AppResult<Session> {
        if !reply.is_student_ok() {
            let message = reply
                .failure_message()
                .unwrap_or_else(|| fallback_message.to_string());
            warn!("⚠️ 登录被拒绝: {}", message);
            return Err(AppError::bad_response("login", None, Some(message)));
        }

        let session = Session {
            user_id: reply.user_id.unwrap_or(-1),
            user_name: reply
                .user_name
                .or_else(|| fallback_name.map(str::to_string))
                .unwrap_or_else(|| email.to_string()),
            email: reply.email.unwrap_or_else(|| email.to_string()),
            token: reply.token,
        };
        self.backend.set_auth_token(session.token.clone());
        Ok(session)
    }
}

/// 本地校验，不通过时不发请求
fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::invalid_input("请输入邮箱和密码"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::invalid_input(format!("邮箱格式不正确: {}", email)));
    }
    Ok(())
}
