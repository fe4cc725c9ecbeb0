//! 会话存储 - 基础设施层
//!
//! 登录态以 [`Session`] 值对象显式传递，持久化通过 [`SessionStore`] 注入

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::error::{AppResult, StoreError};
use crate::models::Session;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 读取当前会话，未登录返回 None
    async fn load(&self) -> AppResult<Option<Session>>;

    async fn save(&self, session: &Session) -> AppResult<()>;

    /// 清除会话（退出登录）
    async fn clear(&self) -> AppResult<()>;
}

/// 写入 `<data_dir>/session.toml`
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("session.toml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_failed(&self.path, e)),
        };
        let session = toml::from_str(&content).map_err(|e| StoreError::TomlParseFailed {
            path: self.path.display().to_string(),
            source: Box::new(e),
        })?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let content = toml::to_string(session).map_err(|e| write_failed(&self.path, e))?;
        write_atomically(&self.path, &content).await?;
        debug!("💾 会话已保存: {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_failed(&self.path, e)),
        }
    }
}

/// 内存实现，用于测试和不需要持久化的场景
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

// ========== 文件辅助函数（进度存储共用） ==========

pub(crate) fn read_failed(
    path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> crate::error::AppError {
    StoreError::ReadFailed {
        path: path.display().to_string(),
        source: Box::new(source),
    }
    .into()
}

pub(crate) fn write_failed(
    path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> crate::error::AppError {
    StoreError::WriteFailed {
        path: path.display().to_string(),
        source: Box::new(source),
    }
    .into()
}

/// 先写临时文件再改名，避免写到一半的文件被读到
pub(crate) async fn write_atomically(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_failed(path, e))?;
    }
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, content)
        .await
        .map_err(|e| write_failed(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| write_failed(path, e))?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "adproject-{}-{}-{}",
        tag,
        std::process::id(),
        n
    ))
}
