//! 提交日志存储 - 基础设施层
//!
//! 只负责读写，不认识配额和优先级

use crate::error::FileError;
use crate::models::SubmissionLog;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// 提交日志的持久化存储
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 读取日志，不存在时返回空日志
    async fn load(&self) -> Result<SubmissionLog, FileError>;

    /// 写回日志
    async fn save(&self, log: &SubmissionLog) -> Result<(), FileError>;
}

/// JSON 文件存储
///
/// 文件存在但无法解析时直接报错，不会用空日志覆盖已有的计数。
pub struct JsonFileLogStore {
    path: PathBuf,
}

impl JsonFileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 与日志同目录的临时文件，文件名带进程号和时间戳避免冲突
    fn tmp_path(&self) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".tmp-{}-{}", std::process::id(), nonce));
        PathBuf::from(name)
    }

    async fn write_tmp(tmp: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(tmp)
            .await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl LogStore for JsonFileLogStore {
    async fn load(&self) -> Result<SubmissionLog, FileError> {
        let path_display = self.path.display().to_string();
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("📁 未找到提交日志，从空日志开始: {}", path_display);
                return Ok(SubmissionLog::new());
            }
            Err(e) => return Err(FileError::read_failed(path_display, e)),
        };

        let log: SubmissionLog = serde_json::from_str(&content).map_err(|source| FileError::Corrupt {
            path: path_display.clone(),
            source,
        })?;
        debug!("加载提交日志: {} 条记录", log.entries.len());
        Ok(log)
    }

    async fn save(&self, log: &SubmissionLog) -> Result<(), FileError> {
        let path_display = self.path.display().to_string();
        let serialized = serde_json::to_vec_pretty(log).map_err(|source| FileError::Corrupt {
            path: path_display.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::write_failed(parent.display().to_string(), e))?;
        }

        // 先写临时文件并落盘再 rename，进程被杀或断电都不会留下半个 JSON
        let tmp = self.tmp_path();
        if let Err(e) = Self::write_tmp(&tmp, &serialized).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(FileError::write_failed(tmp.display().to_string(), e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                warn!("⚠️ 清理临时文件失败 ({}): {}", tmp.display(), cleanup);
            }
            return Err(FileError::write_failed(path_display, e));
        }
        Ok(())
    }
}

/// 内存存储，用于测试和演练
#[derive(Default)]
pub struct MemoryLogStore {
    log: Mutex<Option<SubmissionLog>>,
    saves: Mutex<usize>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: SubmissionLog) -> Self {
        Self {
            log: Mutex::new(Some(log)),
            saves: Mutex::new(0),
        }
    }

    /// 最近一次保存的日志
    pub fn snapshot(&self) -> Option<SubmissionLog> {
        self.log.lock().ok().and_then(|guard| guard.clone())
    }

    /// 保存次数
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|guard| *guard).unwrap_or(0)
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn load(&self) -> Result<SubmissionLog, FileError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    async fn save(&self, log: &SubmissionLog) -> Result<(), FileError> {
        if let Ok(mut guard) = self.log.lock() {
            *guard = Some(log.clone());
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}
