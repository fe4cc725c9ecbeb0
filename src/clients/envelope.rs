//! 后端响应外壳
//!
//! 绝大多数接口返回 `{code, msg, data}`，`code == 1` 表示成功

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, AppError, AppResult};
use crate::models::QuestionSummary;

/// 成功码
pub const CODE_OK: i64 = 1;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        self.code == Some(CODE_OK)
    }

    /// 校验成功码，忽略 data
    pub fn ensure_ok(self, endpoint: &str) -> AppResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(AppError::bad_response(endpoint, self.code, self.msg))
        }
    }

    /// 校验成功码并取出 data
    pub fn into_data(self, endpoint: &str) -> AppResult<T> {
        if !self.is_ok() {
            return Err(AppError::bad_response(endpoint, self.code, self.msg));
        }
        self.data.ok_or_else(|| {
            AppError::Api(ApiError::EmptyResponse {
                endpoint: endpoint.to_string(),
            })
        })
    }
}

/// `data.list` 形式的列表
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListData<T> {
    #[serde(default)]
    pub list: Vec<T>,
}

/// viewQuestion 的返回，失败时带 errorMessage 而不是 code
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReply {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub data: Option<SearchItems>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItems {
    #[serde(default)]
    pub items: Vec<QuestionSummary>,
}

impl SearchReply {
    pub fn into_items(self, endpoint: &str) -> AppResult<Vec<QuestionSummary>> {
        if let Some(message) = self.error_message {
            return Err(AppError::bad_response(endpoint, None, Some(message)));
        }
        Ok(self.data.map(|d| d.items).unwrap_or_default())
    }
}

/// dashboard 的 data
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub accuracy_rates: Vec<f64>,
}

/// 从 getRecommend 的 data 中取 id，兼容 `questionIds` 和 `ids` 两种字段名
pub fn extract_recommend_ids(data: &Value) -> Vec<i64> {
    data.get("questionIds")
        .or_else(|| data.get("ids"))
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|e| e.as_i64()).collect())
        .unwrap_or_default()
}
