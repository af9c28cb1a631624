//! 运行锁 - 基础设施层
//!
//! 对 `<log>.lock` 加操作系统级别的独占建议锁，覆盖整个"读取-修改-写回"过程。
//! 进程退出（包括被 kill）时锁由系统释放。

use crate::error::FileError;
use fd_lock::{RwLock, RwLockWriteGuard};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// 运行锁
pub struct RunLock {
    path: PathBuf,
    lock: RwLock<File>,
}

impl RunLock {
    /// 打开（必要时创建）锁文件，此时尚未加锁
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| FileError::write_failed(parent.display().to_string(), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;
        Ok(Self {
            path,
            lock: RwLock::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 尝试获取独占锁，已被其他进程持有时立即返回 `FileError::Locked`
    pub fn try_acquire(&mut self) -> Result<RwLockWriteGuard<'_, File>, FileError> {
        let display = self.path.display().to_string();
        self.lock.try_write().map_err(|e| match e.kind() {
            std::io::ErrorKind::WouldBlock => FileError::Locked { path: display },
            _ => FileError::write_failed(display, e),
        })
    }
}
