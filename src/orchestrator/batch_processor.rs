//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源准备和一次完整运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、加载凭据、创建索引客户端
//! 2. **运行锁**：同一份提交日志同一时间只允许一个进程写
//! 3. **加载输入**：读取 URL 列表和提交日志
//! 4. **批处理**：委托 `SubmissionController` 提交本批 URL
//! 5. **报告**：生成并写入 indexing_report.txt
//!
//! 凭据或 URL 列表缺失都会在任何网络请求之前失败。

use crate::clients::{Credentials, IndexingClient};
use crate::config::Config;
use crate::infrastructure::{JsonFileLogStore, RunLock};
use crate::models::load_backlog;
use crate::orchestrator::controller::{ControllerSettings, SubmissionController};
use crate::services::{generate_report, ReportWriter};
use crate::utils::logging;
use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    controller: SubmissionController<IndexingClient, JsonFileLogStore>,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        logging::log_startup(&config);

        // 凭据缺失是启动错误
        let credentials = Credentials::from_config(&config)
            .await
            .context("无法加载索引 API 凭据")?;
        let client = IndexingClient::new(&config, credentials)?;
        info!("✅ 索引 API 客户端已就绪: {}", client.endpoint());

        let controller = SubmissionController::new(
            client,
            JsonFileLogStore::new(&config.log_file),
            ControllerSettings::from_config(&config),
        );
        let report_writer = ReportWriter::with_path(&config.report_file);

        Ok(Self {
            config,
            controller,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let mut lock = RunLock::open(self.config.lock_file())?;
        let _guard = lock.try_acquire()?;

        // URL 列表缺失是启动错误，空列表则什么也不提交
        let backlog = load_backlog(&self.config.backlog_file).await?;

        let mut log = self
            .controller
            .load_log()
            .await
            .context("无法读取提交日志，请修复或删除该文件后重试")?;

        let summary = if backlog.is_empty() {
            warn!("⚠️ URL 列表为空，没有需要提交的 URL");
            None
        } else {
            Some(self.controller.process_batch(&mut log, &backlog).await?)
        };

        let report = generate_report(&log, self.config.daily_limit, Local::now());
        info!("\n{}", report);
        self.report_writer.write(&report).await?;

        logging::print_final_stats(
            summary.as_ref(),
            &self.report_writer.path().display().to_string(),
        );
        Ok(())
    }
}
