//! 报告服务 - 业务能力层
//!
//! 只负责"生成报告文本"和"写 indexing_report.txt"，不修改提交日志

use crate::error::FileError;
use crate::models::{LogEntry, SubmissionLog};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 报告中展示的最近条目数量
pub const RECENT_ENTRY_COUNT: usize = 10;

/// 生成提交报告
///
/// # 参数
/// - `log`: 提交日志
/// - `daily_limit`: 每日配额
/// - `generated_at`: 报告生成时间
///
/// # 返回
/// 返回报告文本（总计 + 最近更新的 10 个 URL）
pub fn generate_report(log: &SubmissionLog, daily_limit: u32, generated_at: DateTime<Local>) -> String {
    let mut report = Vec::new();
    report.push("=".repeat(60));
    report.push("Google Search Console 索引提交报告".to_string());
    report.push("=".repeat(60));
    report.push(format!("生成时间: {}", generated_at.format("%Y-%m-%d %H:%M:%S")));
    report.push(String::new());

    report.push("📊 总体统计".to_string());
    report.push(format!("  • 累计提交: {}", log.total_submitted));
    report.push(format!("  • 成功: {}", log.success_count));
    report.push(format!("  • 失败: {}", log.error_count));
    report.push(format!("  • 今日提交: {}/{}", log.submitted_today, daily_limit));
    report.push(String::new());

    report.push(format!("📋 最近提交的 URL (最多 {} 个)", RECENT_ENTRY_COUNT));
    for (url, entry) in log.recent_entries(RECENT_ENTRY_COUNT) {
        match entry {
            LogEntry::Submitted { timestamp, .. } => {
                report.push(format!("  ✅ {}", url));
                report.push(format!("     时间: {}", timestamp.to_rfc3339()));
            }
            LogEntry::Error { timestamp, error } => {
                report.push(format!("  ❌ {}", url));
                report.push(format!("     时间: {}", timestamp.to_rfc3339()));
                report.push(format!("     错误: {}", error));
            }
        }
        report.push(String::new());
    }

    report.push("=".repeat(60));
    report.join("\n")
}

/// 报告写入服务
pub struct ReportWriter {
    report_file_path: PathBuf,
}

impl ReportWriter {
    /// 创建新的报告写入服务
    pub fn new() -> Self {
        Self {
            report_file_path: PathBuf::from("indexing_report.txt"),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_file_path
    }

    /// 写入报告（覆盖旧报告）
    pub async fn write(&self, report: &str) -> Result<(), FileError> {
        debug!(
            "写入报告: {} | 长度: {}",
            self.report_file_path.display(),
            report.len()
        );

        tokio::fs::write(&self.report_file_path, report)
            .await
            .map_err(|e| FileError::write_failed(self.report_file_path.display().to_string(), e))
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn test_report_lists_totals_and_recent() {
        let base = Local.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let mut log = SubmissionLog::new();
        for i in 0..12 {
            log.record_success(&format!("https://x/{i:02}"), json!({}), base + Duration::minutes(i));
        }
        log.record_error("https://x/bad", "Permission denied", base + Duration::hours(1));

        let report = generate_report(&log, 200, base + Duration::hours(2));

        assert!(report.contains("累计提交: 12"));
        assert!(report.contains("失败: 1"));
        assert!(report.contains("今日提交: 12/200"));
        assert!(report.contains("❌ https://x/bad"));
        assert!(report.contains("错误: Permission denied"));
        // 最新的在前，只显示 10 个
        assert_eq!(report.matches("✅").count() + report.matches("❌").count(), 10);
        assert!(report.contains("https://x/11"));
        assert!(!report.contains("https://x/02"));
        let bad = report.find("https://x/bad").unwrap();
        let newest_ok = report.find("https://x/11").unwrap();
        assert!(bad < newest_ok);
    }

    #[test]
    fn test_report_does_not_mutate_log() {
        let mut log = SubmissionLog::new();
        log.record_success("https://x/a", json!({"ok": true}), Local::now());
        let before = log.clone();
        let _ = generate_report(&log, 200, Local::now());
        assert_eq!(log, before);
    }

    #[tokio::test]
    async fn test_writer_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::with_path(dir.path().join("indexing_report.txt"));
        writer.write("first").await.unwrap();
        writer.write("second").await.unwrap();
        let content = tokio::fs::read_to_string(writer.path()).await.unwrap();
        assert_eq!(content, "second");
    }
}
