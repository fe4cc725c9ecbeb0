use serde::{Deserialize, Serialize};

use super::question::QuestionDetail;

/// 一条推荐练习
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedPractice {
    pub id: i64,
    pub title: String,
    /// Base64 编码的题图
    pub image_base64: Option<String>,
    /// 详情拉取失败时的占位记录
    pub placeholder: bool,
}

impl RecommendedPractice {
    pub fn from_detail(id: i64, detail: QuestionDetail) -> Self {
        let title = detail
            .question
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| Self::fallback_title(id));
        Self {
            id,
            title,
            image_base64: detail.image.filter(|img| !img.is_empty()),
            placeholder: false,
        }
    }

    /// 仅有标题、没有图片的占位记录
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            title: Self::fallback_title(id),
            image_base64: None,
            placeholder: true,
        }
    }

    fn fallback_title(id: i64) -> String {
        format!("Question #{}", id)
    }
}
