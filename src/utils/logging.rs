/// 日志工具模块
///
/// 初始化 tracing，并提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::SubmissionLog;
use crate::orchestrator::controller::BatchSummary;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志：输出到终端，同时追加到运行日志文件
///
/// `RUST_LOG` 优先；未设置时默认 `info`，`verbose_logging` 时为 `debug`。
pub fn init(config: &Config) -> Result<()> {
    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.run_log_file)
        .with_context(|| format!("无法打开运行日志: {}", config.run_log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("日志系统初始化失败")?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Google Search Console 索引自动提交启动");
    info!("📊 每日上限: {} | 每批数量: {}", config.daily_limit, config.batch_size);
    info!("📁 URL 列表: {}", config.backlog_file.display());
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `pending`: 待处理 URL 总数
/// - `batch`: 本批计划提交数量
/// - `remaining`: 今日剩余配额
/// - `daily_limit`: 每日上限
pub fn log_batch_start(pending: usize, batch: usize, remaining: u32, daily_limit: u32) {
    info!("\n{}", "=".repeat(60));
    info!("📊 待处理 URL: {} 个", pending);
    info!("📦 本批计划提交: {} 个", batch);
    info!("💡 今日剩余配额: {}/{}", remaining, daily_limit);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(summary: &BatchSummary, log: &SubmissionLog) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批处理完成: 成功 {} | 失败 {} | 延后 {} / 共 {}",
        summary.submitted, summary.failed, summary.deferred, summary.attempted
    );
    info!("📊 总计:");
    info!("   - 累计提交: {}", log.total_submitted);
    info!("   - 成功: {}", log.success_count);
    info!("   - 失败: {}", log.error_count);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 本次批处理结果（URL 列表为空时为 None）
/// - `report_path`: 报告文件路径
pub fn print_final_stats(summary: Option<&BatchSummary>, report_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    match summary {
        Some(summary) => {
            info!("✅ 成功: {}/{}", summary.submitted, summary.attempted);
            info!("❌ 失败: {}", summary.failed);
            if summary.quota_exhausted {
                info!("⏸  今日配额已用完，剩余 URL 明天继续");
            }
        }
        None => info!("没有需要处理的 URL"),
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
