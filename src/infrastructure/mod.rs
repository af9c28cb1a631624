//! 基础设施层：持有文件等稀缺资源，只暴露读写能力

pub mod log_store;
pub mod run_lock;

pub use log_store::{JsonFileLogStore, LogStore, MemoryLogStore};
pub use run_lock::RunLock;
