//! 提交控制器 - 编排层
//!
//! ## 职责
//!
//! 把外部提供的、无序的 URL 列表变成有上限、按优先级排序、去重后的索引请求序列。
//!
//! ## 核心流程
//!
//! 1. **日期切换**：新的一天清零当日计数
//! 2. **配额检查**：配额用完直接返回
//! 3. **筛选排序**：去掉已成功的 URL，按优先级取前 `batch_size` 个
//! 4. **逐个提交**：每次提交前重新检查配额，两次请求之间固定间隔
//! 5. **持久化**：每个记录下来的结果立即写回，结束时更新 `last_run`
//!
//! 所有请求严格顺序执行；单个 URL 的错误不会中断整批。

use crate::clients::IndexingApi;
use crate::config::Config;
use crate::error::FileError;
use crate::infrastructure::LogStore;
use crate::models::{BacklogItem, SubmissionLog};
use crate::services::{has_quota_remaining, remaining_quota, rollover_if_new_day, select_pending};
use crate::utils::logging;
use crate::workflow::{SubmissionCtx, SubmissionFlow, SubmitOutcome};
use chrono::Local;
use std::time::Duration;
use tracing::{info, warn};

/// 控制器参数
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    /// 每日提交上限
    pub daily_limit: u32,
    /// 每次运行最多处理的 URL 数量
    pub batch_size: usize,
    /// 两次请求之间的间隔
    pub pacing_delay: Duration,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            daily_limit: config.daily_limit,
            batch_size: config.batch_size,
            pacing_delay: config.pacing_delay(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 一次批处理的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 待处理 URL 总数（筛选后）
    pub pending: usize,
    /// 实际发出的请求数
    pub attempted: usize,
    /// 成功
    pub submitted: usize,
    /// API 拒绝
    pub failed: usize,
    /// 请求未完成
    pub deferred: usize,
    /// 是否因配额用完而停止
    pub quota_exhausted: bool,
}

/// 提交控制器
pub struct SubmissionController<A, S> {
    api: A,
    store: S,
    settings: ControllerSettings,
}

impl<A: IndexingApi, S: LogStore> SubmissionController<A, S> {
    pub fn new(api: A, store: S, settings: ControllerSettings) -> Self {
        Self {
            api,
            store,
            settings,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// 读取提交日志
    pub async fn load_log(&self) -> Result<SubmissionLog, FileError> {
        self.store.load().await
    }

    /// 处理一批 URL
    ///
    /// # 参数
    /// - `log`: 提交日志（原地修改）
    /// - `backlog`: 外部提供的 URL 列表
    ///
    /// # 返回
    /// 返回本批统计；只有写回日志失败才会返回错误
    pub async fn process_batch(
        &self,
        log: &mut SubmissionLog,
        backlog: &[BacklogItem],
    ) -> Result<BatchSummary, FileError> {
        let daily_limit = self.settings.daily_limit;
        let today = Local::now().date_naive();

        if rollover_if_new_day(log, today) {
            info!("📅 新的一天 ({})，当日计数已清零", today);
        }

        if !has_quota_remaining(log, daily_limit) {
            warn!("⚠️ 已达到每日上限: {}/{}", log.submitted_today, daily_limit);
            info!("今日配额已用完，请明天再运行");
            return Ok(BatchSummary {
                quota_exhausted: true,
                ..Default::default()
            });
        }

        let pending = select_pending(log, backlog);
        let batch: Vec<&BacklogItem> = pending.iter().take(self.settings.batch_size).collect();
        logging::log_batch_start(
            pending.len(),
            batch.len(),
            remaining_quota(log, daily_limit),
            daily_limit,
        );

        let flow = SubmissionFlow::new(&self.api);
        let mut summary = BatchSummary {
            pending: pending.len(),
            ..Default::default()
        };

        for (index, item) in batch.iter().enumerate() {
            if !has_quota_remaining(log, daily_limit) {
                warn!("⚠️ 已达到每日上限，停止本批处理");
                break;
            }

            if index > 0 {
                tokio::time::sleep(self.settings.pacing_delay).await;
            }

            let ctx = SubmissionCtx::new(item.url.clone(), index + 1, batch.len(), item.priority_score);
            let outcome = flow.submit_one(log, &ctx).await;
            summary.attempted += 1;

            match &outcome {
                SubmitOutcome::Submitted => summary.submitted += 1,
                SubmitOutcome::Failed(_) => summary.failed += 1,
                SubmitOutcome::Deferred(_) => summary.deferred += 1,
            }

            // 逐条写回，进程中途退出时已完成的结果不会丢失
            if outcome.is_recorded() {
                if let Err(e) = self.store.save(log).await {
                    warn!("写回提交日志失败，批处理结束时再试: {}", e);
                }
            }
        }

        summary.quota_exhausted = !has_quota_remaining(log, daily_limit);
        log.last_run = Some(Local::now());
        self.store.save(log).await?;

        logging::log_batch_complete(&summary, log);
        Ok(summary)
    }

    /// 读取日志、处理一批并返回更新后的日志
    pub async fn run_once(&self, backlog: &[BacklogItem]) -> Result<(SubmissionLog, BatchSummary), FileError> {
        let mut log = self.load_log().await?;
        let summary = self.process_batch(&mut log, backlog).await?;
        Ok((log, summary))
    }
}
