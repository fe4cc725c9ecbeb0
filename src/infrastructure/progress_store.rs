//! 作业作答进度存储 - 基础设施层
//!
//! 每份作业一条记录：题目 id → 所选下标，以及是否已完成提交

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::session_store::{read_failed, write_atomically, write_failed};
use crate::error::{AppResult, StoreError};
use crate::models::AnswerProgress;

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// 读取某份作业的进度，不存在时返回空进度
    async fn load(&self, assignment_id: i64) -> AppResult<AnswerProgress>;

    async fn save(&self, assignment_id: i64, progress: &AnswerProgress) -> AppResult<()>;

    /// 记录一道题的选择
    ///
    /// 默认实现的读-改-写不是原子的，允许并发写的实现需要覆盖
    async fn set_answer(&self, assignment_id: i64, question_id: i64, choice: usize) -> AppResult<AnswerProgress> {
        let mut progress = self.load(assignment_id).await?;
        progress.answers.insert(question_id, choice);
        self.save(assignment_id, &progress).await?;
        Ok(progress)
    }

    /// 标记作业已完成
    async fn set_completed(&self, assignment_id: i64) -> AppResult<()> {
        let mut progress = self.load(assignment_id).await?;
        progress.completed = true;
        self.save(assignment_id, &progress).await
    }
}

// ========== 文件格式 ==========

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressFile {
    #[serde(default)]
    assignment: Vec<AssignmentEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AssignmentEntry {
    id: i64,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    answers: Vec<AnswerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnswerEntry {
    question: i64,
    choice: usize,
}

impl AssignmentEntry {
    fn to_progress(&self) -> AnswerProgress {
        AnswerProgress {
            answers: self.answers.iter().map(|a| (a.question, a.choice)).collect(),
            completed: self.completed,
        }
    }

    fn from_progress(id: i64, progress: &AnswerProgress) -> Self {
        Self {
            id,
            completed: progress.completed,
            answers: progress
                .answers
                .iter()
                .map(|(&question, &choice)| AnswerEntry { question, choice })
                .collect(),
        }
    }
}

/// 所有作业进度写在 `<data_dir>/progress.toml`
pub struct FileProgressStore {
    path: PathBuf,
    // 持有期间完成整个读-改-写
    write_lock: tokio::sync::Mutex<()>,
}

impl FileProgressStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("progress.toml"),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_file(&self) -> AppResult<ProgressFile> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ProgressFile::default()),
            Err(e) => return Err(read_failed(&self.path, e)),
        };
        toml::from_str(&content).map_err(|e| {
            StoreError::TomlParseFailed {
                path: self.path.display().to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    /// 在写锁内读出某份作业的进度，修改后整体写回
    async fn update<F>(&self, assignment_id: i64, change: F) -> AppResult<AnswerProgress>
    where
        F: FnOnce(&mut AnswerProgress) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read_file().await?;
        let mut progress = file
            .assignment
            .iter()
            .find(|e| e.id == assignment_id)
            .map(AssignmentEntry::to_progress)
            .unwrap_or_default();
        change(&mut progress);

        let entry = AssignmentEntry::from_progress(assignment_id, &progress);
        match file.assignment.iter_mut().find(|e| e.id == assignment_id) {
            Some(existing) => *existing = entry,
            None => file.assignment.push(entry),
        }

        let content = toml::to_string(&file).map_err(|e| write_failed(&self.path, e))?;
        write_atomically(&self.path, &content).await?;
        debug!(
            "💾 作业 {} 进度已保存 ({} 题, completed={})",
            assignment_id,
            progress.answered(),
            progress.completed
        );
        Ok(progress)
    }
}

#[async_trait]
impl ProgressStore for FileProgressStore {
    async fn load(&self, assignment_id: i64) -> AppResult<AnswerProgress> {
        let file = self.read_file().await?;
        Ok(file
            .assignment
            .iter()
            .find(|e| e.id == assignment_id)
            .map(AssignmentEntry::to_progress)
            .unwrap_or_default())
    }

    async fn save(&self, assignment_id: i64, progress: &AnswerProgress) -> AppResult<()> {
        let progress = progress.clone();
        self.update(assignment_id, move |current| *current = progress)
            .await
            .map(|_| ())
    }

    async fn set_answer(&self, assignment_id: i64, question_id: i64, choice: usize) -> AppResult<AnswerProgress> {
        self.update(assignment_id, |progress| {
            progress.answers.insert(question_id, choice);
        })
        .await
    }

    async fn set_completed(&self, assignment_id: i64) -> AppResult<()> {
        self.update(assignment_id, |progress| progress.completed = true)
            .await
            .map(|_| ())
    }
}

/// 内存实现
#[derive(Default)]
pub struct MemoryProgressStore {
    records: Mutex<HashMap<i64, AnswerProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, assignment_id: i64, change: F) -> AppResult<AnswerProgress>
    where
        F: FnOnce(&mut AnswerProgress),
    {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let progress = records.entry(assignment_id).or_default();
        change(progress);
        Ok(progress.clone())
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, assignment_id: i64) -> AppResult<AnswerProgress> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(records.get(&assignment_id).cloned().unwrap_or_default())
    }

    async fn save(&self, assignment_id: i64, progress: &AnswerProgress) -> AppResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        records.insert(assignment_id, progress.clone());
        Ok(())
    }

    async fn set_answer(&self, assignment_id: i64, question_id: i64, choice: usize) -> AppResult<AnswerProgress> {
        self.update(assignment_id, |progress| {
            progress.answers.insert(question_id, choice);
        })
    }

    async fn set_completed(&self, assignment_id: i64) -> AppResult<()> {
        self.update(assignment_id, |progress| progress.completed = true)
            .map(|_| ())
    }
}
