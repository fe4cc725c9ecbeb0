use serde::{Deserialize, Serialize};

/// 当前登录用户
///
/// 以值对象的形式在组件间传递，读写经由 [`crate::infrastructure::SessionStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// 登录接口返回
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_authority: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, alias = "name")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl LoginReply {
    /// 只有学生账号登录成功才算数
    pub fn is_student_ok(&self) -> bool {
        let eq = |v: &Option<String>, expected: &str| {
            v.as_deref()
                .map(|s| s.eq_ignore_ascii_case(expected))
                .unwrap_or(false)
        };
        eq(&self.status, "ok") && eq(&self.current_authority, "student")
    }

    pub fn failure_message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.msg.clone())
    }
}

/// 注册请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub address: String,
    pub email: String,
    pub gender: String,
    pub group: String,
    pub name: String,
    pub password: String,
    pub phone: String,
    pub signature: String,
    pub tags: Vec<String>,
    pub title: String,
}

impl RegisterRequest {
    /// 只填必填项，其余字段使用后端可接受的缺省值
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: "N/A".to_string(),
            email: email.into(),
            gender: "male".to_string(),
            group: "default".to_string(),
            name: name.into(),
            password: password.into(),
            phone: "0000000000".to_string(),
            signature: String::new(),
            tags: Vec::new(),
            title: "student".to_string(),
        }
    }

    /// 逗号分隔的标签输入
    pub fn with_tags(mut self, input: &str) -> Self {
        self.tags = input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        self
    }
}

/// 注册接口返回
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegisterReply {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
}
