//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次运行的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载凭据、URL 列表、提交日志
//! - 持有运行锁
//! - 写报告、输出最终统计
//!
//! ### `controller` - 提交控制器
//! - 日期切换与配额检查
//! - 筛选、排序、截取本批 URL
//! - 顺序提交并控制请求间隔
//! - 逐条写回提交日志
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (一次运行)
//!     ↓
//! controller (一批 URL)
//!     ↓
//! workflow::SubmissionFlow (单个 URL)
//!     ↓
//! services / clients (配额、筛选、报告 / 索引 API)
//!     ↓
//! infrastructure (提交日志存储、运行锁)
//! ```

pub mod batch_processor;
pub mod controller;

// 重新导出主要类型
pub use batch_processor::App;
pub use controller::{BatchSummary, ControllerSettings, SubmissionController};
