//! 作业批改 - 流程层
//!
//! 流程顺序：
//! 1. 本地校验作答数与题目数一致（不满足时不发任何请求）
//! 2. 并发拉取每道题的权威答案
//! 3. 归一化答案下标并判分，单题拉取失败按答错计
//! 4. 计算正确率并提交完成状态
//! 5. 后端确认后在本地标记完成

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::clients::Backend;
use crate::error::{AppResult, BusinessError};
use crate::infrastructure::{ProgressStore, ScreenScope};
use crate::models::AnswerProgress;

/// 把后端给出的正确下标归一化为 0 基
///
/// 落在 `[1, num_choices]` 内按 1 基处理减一，否则视为已是 0 基。
/// 0 与 1 基的边界本身有歧义，这里对所有题目一致地套用同一条规则。
pub fn reconcile_correct_index(raw: i64, num_choices: usize) -> i64 {
    let upper = i64::try_from(num_choices).unwrap_or(i64::MAX);
    if (1..=upper).contains(&raw) {
        raw - 1
    } else {
        raw
    }
}

/// 正确率百分比，四舍五入到两位小数（整数运算，避免浮点误差）
pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let (correct, total) = (correct as u64, total as u64);
    let hundredths = (correct * 20_000 + total) / (2 * total);
    hundredths as f64 / 100.0
}

/// 单题判分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGrade {
    pub question_id: i64,
    pub chosen: usize,
    /// 归一化后的正确下标，拉取失败时为 None
    pub correct_index: Option<i64>,
    pub is_correct: bool,
}

/// 完成状态的提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// 后端已确认，本地已标记完成
    Acknowledged,
    /// 提交失败，可以原样重试
    Retry { reason: String },
}

/// 批改报告
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub assignment_id: i64,
    pub total: usize,
    pub correct: usize,
    /// 百分比，两位小数
    pub accuracy: f64,
    pub grades: Vec<QuestionGrade>,
    pub submission: Submission,
}

impl GradeReport {
    pub fn is_acknowledged(&self) -> bool {
        self.submission == Submission::Acknowledged
    }
}

/// 作业批改器
pub struct AssignmentGrader {
    backend: Arc<dyn Backend>,
    progress: Arc<dyn ProgressStore>,
    scope: ScreenScope,
}

impl AssignmentGrader {
    pub fn new(backend: Arc<dyn Backend>, progress: Arc<dyn ProgressStore>, scope: ScreenScope) -> Self {
        Self {
            backend,
            progress,
            scope,
        }
    }

    /// 当前作答进度
    pub async fn progress(&self, assignment_id: i64) -> AppResult<AnswerProgress> {
        self.progress.load(assignment_id).await
    }

    /// 记录一道题的选择（可反复修改）
    pub async fn record_answer(
        &self,
        assignment_id: i64,
        question_id: i64,
        choice: usize,
    ) -> AppResult<AnswerProgress> {
        self.progress.set_answer(assignment_id, question_id, choice).await
    }

    /// 批改并提交
    ///
    /// # 参数
    /// - `assignment_id`: 作业 id
    /// - `question_ids`: 作业中全部题目的 id
    ///
    /// # 返回
    /// 作答数与题目数不一致时返回 [`BusinessError::IncompleteAnswers`]；
    /// 完成状态提交失败不算错误，体现在 [`GradeReport::submission`] 中
    pub async fn grade(&self, assignment_id: i64, question_ids: &[i64]) -> AppResult<GradeReport> {
        let progress = self.progress.load(assignment_id).await?;
        let total = question_ids.len();
        // 作答数必须与题目数相等，空作业 0 == 0 照常提交 0 分
        if !progress.is_complete_for(total) {
            return Err(BusinessError::IncompleteAnswers {
                answered: progress.answered(),
                total,
            }
            .into());
        }

        info!("[作业 {}] 📝 开始批改 {} 道题", assignment_id, total);

        let fetches = question_ids.iter().map(|&id| {
            let backend = Arc::clone(&self.backend);
            async move { (id, backend.question_detail(id).await) }
        });
        let details = self.scope.run(join_all(fetches)).await?;

        let grades: Vec<QuestionGrade> = details
            .into_iter()
            .map(|(question_id, result)| {
                let chosen = progress.answer_for(question_id).unwrap_or_default();
                match result {
                    Ok(detail) => {
                        let correct_index = detail.correct_index();
                        QuestionGrade {
                            question_id,
                            chosen,
                            correct_index: Some(correct_index),
                            is_correct: i64::try_from(chosen).ok() == Some(correct_index),
                        }
                    }
                    Err(e) => {
                        warn!(
                            "[作业 {}] ⚠️ 题目 {} 答案获取失败，按答错计: {}",
                            assignment_id, question_id, e
                        );
                        QuestionGrade {
                            question_id,
                            chosen,
                            correct_index: None,
                            is_correct: false,
                        }
                    }
                }
            })
            .collect();

        let correct = grades.iter().filter(|g| g.is_correct).count();
        let accuracy = accuracy_percent(correct, total);
        info!(
            "[作业 {}] ✓ 批改完成: {}/{} 正确，正确率 {:.2}%",
            assignment_id, correct, total, accuracy
        );

        let submitted = self
            .scope
            .run(self.backend.finish_assignment(assignment_id, true, accuracy))
            .await?;

        let submission = match submitted {
            Ok(()) => {
                if let Err(e) = self.progress.set_completed(assignment_id).await {
                    warn!("[作业 {}] ⚠️ 本地完成标记写入失败: {}", assignment_id, e);
                }
                info!("[作业 {}] 📤 完成状态已提交", assignment_id);
                Submission::Acknowledged
            }
            Err(e) => {
                warn!("[作业 {}] ⚠️ 完成状态提交失败，可重试: {}", assignment_id, e);
                Submission::Retry {
                    reason: e.user_message(),
                }
            }
        };

        Ok(GradeReport {
            assignment_id,
            total,
            correct,
            accuracy,
            grades,
            submission,
        })
    }
}
