use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// 某份作业的本地作答进度
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerProgress {
    /// 题目 id → 所选选项下标（0 基）
    pub answers: BTreeMap<i64, usize>,
    /// 本地是否已完成提交
    pub completed: bool,
}

impl AnswerProgress {
    /// 已作答题数
    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// 是否每道题都已作答
    pub fn is_complete_for(&self, total: usize) -> bool {
        self.answers.len() == total
    }

    pub fn answer_for(&self, question_id: i64) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }
}

/// 作业中的一道题（selectAssignment 返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuestion {
    pub id: i64,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// 班级下的一份作业（selectClass 返回的列表项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAssignment {
    pub assignment_id: i64,
    #[serde(default)]
    pub assignment_name: String,
    /// 截止时间 `[yyyy, M, d, HH, mm, ss]`
    #[serde(default)]
    pub expire_time: Vec<i32>,
    /// 后端记录的完成标记，1 表示已完成
    #[serde(default)]
    pub whether_finish: i32,
}

impl ClassAssignment {
    pub fn due(&self) -> Option<NaiveDateTime> {
        timestamp::from_parts(&self.expire_time)
    }

    pub fn due_text(&self) -> String {
        timestamp::display(&self.expire_time)
    }

    /// 结合本地进度推导作业状态
    ///
    /// 过期优先，其次是远端或本地的完成标记，再其次是是否已经开始作答
    pub fn status(&self, progress: &AnswerProgress, now: NaiveDateTime) -> AssignmentStatus {
        match self.due() {
            Some(due) if now > due => AssignmentStatus::Expired,
            _ if self.whether_finish == 1 || progress.completed => AssignmentStatus::Completed,
            _ if progress.answered() > 0 => AssignmentStatus::InProgress {
                answered: progress.answered(),
            },
            _ => AssignmentStatus::NotStarted,
        }
    }
}

/// 作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    Expired,
    Completed,
    InProgress { answered: usize },
    NotStarted,
}

impl AssignmentStatus {
    /// 过期作业不可再进入
    pub fn is_open(self) -> bool {
        !matches!(self, AssignmentStatus::Expired)
    }

    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Expired => "Expired",
            AssignmentStatus::Completed => "Completed",
            AssignmentStatus::InProgress { .. } => "In progress",
            AssignmentStatus::NotStarted => "Not started",
        }
    }
}

/// 班级详情（selectClass 返回）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub list: Vec<ClassAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn assignment(expire: Vec<i32>, finished: i32) -> ClassAssignment {
        ClassAssignment {
            assignment_id: 7,
            assignment_name: "Unit 1".to_string(),
            expire_time: expire,
            whether_finish: finished,
        }
    }

    #[test]
    fn expired_wins_over_completion() {
        let a = assignment(vec![2025, 1, 1, 0, 0], 1);
        let progress = AnswerProgress::default();
        assert_eq!(a.status(&progress, at(2025, 2, 1)), AssignmentStatus::Expired);
    }

    #[test]
    fn local_completion_counts() {
        let a = assignment(vec![2030, 1, 1, 0, 0], 0);
        let progress = AnswerProgress {
            completed: true,
            ..Default::default()
        };
        assert_eq!(a.status(&progress, at(2025, 2, 1)), AssignmentStatus::Completed);
    }

    #[test]
    fn partial_answers_mean_in_progress() {
        let a = assignment(Vec::new(), 0);
        let mut progress = AnswerProgress::default();
        progress.answers.insert(1, 2);
        assert_eq!(
            a.status(&progress, at(2025, 2, 1)),
            AssignmentStatus::InProgress { answered: 1 }
        );
        assert_eq!(
            a.status(&AnswerProgress::default(), at(2025, 2, 1)),
            AssignmentStatus::NotStarted
        );
    }

    #[test]
    fn only_expired_assignments_are_closed() {
        let a = assignment(vec![2025, 3, 9, 8, 5], 0);
        assert_eq!(a.due_text(), "2025-03-09 08:05");
        let status = a.status(&AnswerProgress::default(), at(2025, 4, 1));
        assert!(!status.is_open());
        assert_eq!(status.label(), "Expired");
        assert!(AssignmentStatus::InProgress { answered: 2 }.is_open());
        assert_eq!(AssignmentStatus::NotStarted.label(), "Not started");
    }
}
