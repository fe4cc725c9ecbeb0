use serde::{Deserialize, Serialize};

/// 可按 id 去重的记录
pub trait Identified {
    fn id(&self) -> i64;
}

/// 题库列表中的一道题（viewQuestion 返回的单条记录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: i64,
    #[serde(default, alias = "questionName", alias = "question")]
    pub title: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    /// 题目在检索结果中的序号
    #[serde(default)]
    pub question_index: Option<i64>,
}

impl Identified for QuestionSummary {
    fn id(&self) -> i64 {
        self.id
    }
}

/// 题目详情（doquestion 返回）
///
/// `answer` 是后端给出的原始正确下标，可能是 0 基也可能是 1 基，
/// 使用前需经过 [`crate::workflow::reconcile_correct_index`] 归一化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    pub answer: i64,
    /// Base64 编码的题图
    #[serde(default)]
    pub image: Option<String>,
}

impl QuestionDetail {
    /// 归一化后的 0 基正确下标
    pub fn correct_index(&self) -> i64 {
        crate::workflow::reconcile_correct_index(self.answer, self.choices.len())
    }

    /// 正确选项的文本
    pub fn correct_choice(&self) -> Option<&str> {
        usize::try_from(self.correct_index())
            .ok()
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }
}

/// 一次题库检索请求
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// 题目名称关键字
    pub question_name: String,
    /// 逗号拼接的已选年级
    pub grade: String,
    /// 逗号拼接的已选学科
    pub subject: String,
    /// 逗号拼接的已选分类
    pub category: String,
    /// 逗号拼接的已选主题
    pub topic: String,
    /// 页码（从 1 开始）
    pub page: u32,
}
