use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 业务逻辑错误（本地前置条件、流程状态）
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（无响应、超时、连接失败）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): code={code:?}, message={message:?}")]
    BadResponse {
        endpoint: String,
        code: Option<i64>,
        message: Option<String>,
    },
    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 作业还有未作答的题目
    #[error("还有未作答的题目 ({answered}/{total})")]
    IncompleteAnswers { answered: usize, total: usize },
    /// 已有请求在进行中
    #[error("正在加载中，请稍候")]
    AlreadyLoading,
    /// 触发推荐失败
    #[error("触发推荐失败")]
    RecommendTriggerFailed,
    /// 轮询结束仍没有新的推荐
    #[error("当前没有可用的推荐题目")]
    NoRecommendations,
    /// 未登录
    #[error("尚未登录")]
    NotLoggedIn,
    /// 登录态失效（后端拦截）
    #[error("未登录或会话已失效: {message}")]
    SessionExpired { message: String },
    /// 输入校验失败
    #[error("输入不合法: {reason}")]
    InvalidInput { reason: String },
    /// 未选择选项
    #[error("请选择一个选项")]
    NothingChosen,
    /// 选项下标超出范围
    #[error("选项 {index} 超出范围 [0, {max_index}]")]
    ChoiceOutOfRange { index: usize, max_index: usize },
    /// 页面已销毁，操作被取消
    #[error("页面已关闭，操作已取消")]
    Cancelled,
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 锁已中毒
    #[error("存储锁不可用: {0}")]
    Poisoned(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::Api(ApiError::JsonParseFailed {
                source: Box::new(err),
            });
        }
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Store(StoreError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Store(StoreError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建API错误响应
    pub fn bad_response(
        endpoint: impl Into<String>,
        code: Option<i64>,
        message: Option<String>,
    ) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            code,
            message,
        })
    }

    /// 创建输入校验错误
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AppError::Business(BusinessError::InvalidInput {
            reason: reason.into(),
        })
    }

    /// 网络层失败（可直接重试同一入口）
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Api(ApiError::RequestFailed { .. }))
    }

    /// 本地前置条件失败，没有发出任何网络请求
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AppError::Business(
                BusinessError::IncompleteAnswers { .. }
                    | BusinessError::InvalidInput { .. }
                    | BusinessError::NothingChosen
                    | BusinessError::ChoiceOutOfRange { .. }
                    | BusinessError::NotLoggedIn
            )
        )
    }

    /// 面向用户的提示文本
    ///
    /// 后端给了消息就原样展示，否则退回通用提示
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::RequestFailed { .. }) => "网络连接失败".to_string(),
            AppError::Api(ApiError::BadResponse {
                message: Some(msg), ..
            }) if !msg.trim().is_empty() => msg.clone(),
            AppError::Api(ApiError::BadResponse { code, .. }) => match code {
                Some(code) => format!("请求失败：{}", code),
                None => "请求失败，请稍后重试".to_string(),
            },
            AppError::Api(ApiError::EmptyResponse { .. }) => "请求失败：服务器返回空数据".to_string(),
            AppError::Api(ApiError::JsonParseFailed { .. }) => "服务器数据格式错误".to_string(),
            AppError::Business(e) => e.to_string(),
            other => format!("发生未知错误: {}", other),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
