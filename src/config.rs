use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端接口根路径（以 / 结尾）
    pub api_base_url: String,
    /// 连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 搜索框防抖间隔（毫秒）
    pub search_debounce_ms: u64,
    /// 推荐轮询最大次数
    pub recommend_max_attempts: usize,
    /// 推荐轮询间隔（毫秒）
    pub recommend_delay_ms: u64,
    /// 本地数据目录（会话、作答进度）
    pub data_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 命令行驱动使用的登录信息 ---
    pub login_email: Option<String>,
    pub login_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://10.0.2.2:8080/student/".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 20,
            search_debounce_ms: 400,
            recommend_max_attempts: 4,
            recommend_delay_ms: 800,
            data_dir: ".adproject".to_string(),
            verbose_logging: false,
            login_email: None,
            login_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            connect_timeout_secs: env_parse("CONNECT_TIMEOUT_SECS", default.connect_timeout_secs),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", default.request_timeout_secs),
            search_debounce_ms: env_parse("SEARCH_DEBOUNCE_MS", default.search_debounce_ms),
            recommend_max_attempts: env_parse(
                "RECOMMEND_MAX_ATTEMPTS",
                default.recommend_max_attempts,
            ),
            recommend_delay_ms: env_parse("RECOMMEND_DELAY_MS", default.recommend_delay_ms),
            data_dir: std::env::var("DATA_DIR").unwrap_or(default.data_dir),
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging),
            login_email: std::env::var("LOGIN_EMAIL").ok().or(default.login_email),
            login_password: std::env::var("LOGIN_PASSWORD").ok().or(default.login_password),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                reason: format!("'{}' 不是 http(s) 地址", self.api_base_url),
            }
            .into());
        }
        if self.recommend_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recommend_max_attempts".to_string(),
                reason: "至少需要轮询一次".to_string(),
            }
            .into());
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                reason: "超时时间必须大于 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// 规范化后的接口根路径，保证以 / 结尾
    pub fn normalized_base_url(&self) -> String {
        if self.api_base_url.ends_with('/') {
            self.api_base_url.clone()
        } else {
            format!("{}/", self.api_base_url)
        }
    }
}

/// 读取并解析环境变量，缺失或无法解析时用默认值
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
