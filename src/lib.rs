//! # Indexing Submit
//!
//! 按优先级把网站 URL 提交到 Google Indexing API 的命令行工具，
//! 遵守每日配额，跨运行记录提交状态，失败的 URL 下次自动重试。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文件资源，只暴露读写能力
//! - `JsonFileLogStore` - 提交日志的原子读写
//! - `RunLock` - 单写者运行锁
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 配额、筛选排序、报告生成
//! - `clients/` - 服务账号认证、索引 API 调用
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 URL"的提交流程
//! - `SubmissionCtx` - 上下文封装（URL + 批内位置）
//! - `SubmissionFlow` - 调用 API 并记录结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/controller` - 配额检查、批量顺序提交、逐条持久化
//! - `orchestrator/batch_processor` - 应用入口，准备资源并写报告
//!
//! ## 已知限制
//!
//! 同一份提交日志只支持单个写者，由 `RunLock` 保证；
//! 请求没有重试退避，暂时性失败的 URL 留到下次运行。

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use clients::{ChangeType, Credentials, IndexingApi, IndexingClient};
pub use config::Config;
pub use error::{ApiError, AppError};
pub use infrastructure::{JsonFileLogStore, LogStore, MemoryLogStore};
pub use models::{BacklogItem, LogEntry, SubmissionLog};
pub use orchestrator::{App, BatchSummary, ControllerSettings, SubmissionController};
pub use workflow::{SubmissionCtx, SubmissionFlow, SubmitOutcome};
