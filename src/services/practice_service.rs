/// 单题练习服务
///
/// 拉取题目详情 → 选择选项 → 本地判分并上报。
/// 上报失败不影响本地判分结果，只体现在 `reported` 上。
use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::Backend;
use crate::error::{AppResult, BusinessError};
use crate::models::QuestionDetail;

/// 作答反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// 归一化后的 0 基正确下标
    pub correct_index: i64,
    pub correct_choice: Option<String>,
    /// 是否已成功上报后端
    pub reported: bool,
}

/// 一道正在练习的题目
#[derive(Debug, Clone)]
pub struct PracticeSession {
    question_id: i64,
    detail: QuestionDetail,
    selected: Option<usize>,
    feedback: Option<AnswerFeedback>,
}

impl PracticeSession {
    pub fn question_id(&self) -> i64 {
        self.question_id
    }

    pub fn detail(&self) -> &QuestionDetail {
        &self.detail
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.feedback.is_some()
    }

    /// 选择一个选项；确认之后的选择被忽略
    pub fn select(&mut self, choice: usize) -> AppResult<()> {
        if self.is_confirmed() {
            return Ok(());
        }
        let count = self.detail.choices.len();
        if choice >= count {
            return Err(BusinessError::ChoiceOutOfRange {
                index: choice,
                max_index: count.saturating_sub(1),
            }
            .into());
        }
        self.selected = Some(choice);
        Ok(())
    }
}

pub struct PracticeService {
    backend: Arc<dyn Backend>,
}

impl PracticeService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// 打开一道题
    pub async fn open(&self, question_id: i64) -> AppResult<PracticeSession> {
        let detail = self.backend.question_detail(question_id).await?;
        Ok(PracticeSession {
            question_id,
            detail,
            selected: None,
            feedback: None,
        })
    }

    /// 确认作答
    ///
    /// 同一道题只判一次，重复确认直接返回第一次的反馈
    pub async fn confirm(&self, session: &mut PracticeSession) -> AppResult<AnswerFeedback> {
        if let Some(feedback) = &session.feedback {
            return Ok(feedback.clone());
        }
        let choice = session.selected.ok_or(BusinessError::NothingChosen)?;

        let correct_index = session.detail.correct_index();
        let correct = i64::try_from(choice).ok() == Some(correct_index);

        let reported = match self
            .backend
            .submit_answer(session.question_id, correct, choice)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("[题目 {}] ⚠️ 作答上报失败: {}", session.question_id, e);
                false
            }
        };
        info!(
            "[题目 {}] {} 选择 {}，正确答案 {}",
            session.question_id,
            if correct { "✅" } else { "❌" },
            choice,
            correct_index
        );

        let feedback = AnswerFeedback {
            correct,
            correct_index,
            correct_choice: session.detail.correct_choice().map(str::to_string),
            reported,
        };
        session.feedback = Some(feedback.clone());
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::{detail, MockBackend};

    #[tokio::test]
    async fn correct_answer_is_judged_and_reported() {
        let mock = Arc::new(MockBackend::new());
        // 1 基的 3 → 0 基的 2
        mock.set_detail(detail(5, &["cat", "fish", "whale", "crab"], 3));
        let service = PracticeService::new(mock.clone());

        let mut session = service.open(5).await.unwrap();
        session.select(2).unwrap();
        let feedback = service.confirm(&mut session).await.unwrap();

        assert!(feedback.correct);
        assert_eq!(feedback.correct_choice.as_deref(), Some("whale"));
        assert!(feedback.reported);
        assert_eq!(mock.submitted_answers(), vec![(5, true, 2)]);
    }

    #[tokio::test]
    async fn nothing_chosen_is_a_precondition_failure() {
        let mock = Arc::new(MockBackend::new());
        mock.set_detail(detail(5, &["a", "b"], 0));
        let service = PracticeService::new(mock.clone());
        let mut session = service.open(5).await.unwrap();

        let err = service.confirm(&mut session).await.unwrap_err();
        assert!(matches!(err, AppError::Business(BusinessError::NothingChosen)));
        assert!(session.select(9).is_err());
        assert!(mock.submitted_answers().is_empty());
    }

    #[tokio::test]
    async fn reporting_failure_keeps_local_judgement_and_second_confirm_is_noop() {
        let mock = Arc::new(MockBackend::new());
        mock.set_detail(detail(5, &["a", "b"], 0));
        mock.set_submit_ok(false);
        let service = PracticeService::new(mock.clone());
        let mut session = service.open(5).await.unwrap();
        session.select(1).unwrap();

        let first = service.confirm(&mut session).await.unwrap();
        assert!(!first.correct);
        assert!(!first.reported);

        session.select(0).unwrap();
        let second = service.confirm(&mut session).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(session.selected(), Some(1));
        assert_eq!(mock.submitted_answers().len(), 1);
    }
}
