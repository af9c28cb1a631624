//! 提交日志 - 跨运行持久化的状态

use super::timestamp;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 单个 URL 最近一次提交的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LogEntry {
    /// 提交成功，保存 API 原始响应
    Submitted {
        #[serde(deserialize_with = "timestamp::deserialize")]
        timestamp: DateTime<Local>,
        response: Value,
    },
    /// API 明确返回错误，下次运行会重试
    Error {
        #[serde(deserialize_with = "timestamp::deserialize")]
        timestamp: DateTime<Local>,
        error: String,
    },
}

/// 日志条目状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Submitted,
    Error,
}

impl LogEntry {
    pub fn status(&self) -> EntryStatus {
        match self {
            LogEntry::Submitted { .. } => EntryStatus::Submitted,
            LogEntry::Error { .. } => EntryStatus::Error,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            LogEntry::Submitted { timestamp, .. } | LogEntry::Error { timestamp, .. } => *timestamp,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status() == EntryStatus::Submitted
    }
}

/// 提交日志
///
/// 首次运行时为空，之后每次运行加载、原地修改并写回。
/// `total_submitted` / `success_count` / `error_count` 只增不减。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionLog {
    /// 最近一次运行时间
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_run: Option<DateTime<Local>>,
    /// `submitted_today` 所计数的日期（旧日志中不存在时退回 `last_run` 的日期）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_date: Option<NaiveDate>,
    #[serde(default)]
    pub submitted_today: u32,
    #[serde(default)]
    pub total_submitted: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub error_count: u64,
    /// URL → 最近一次提交结果
    #[serde(default, rename = "urls")]
    pub entries: BTreeMap<String, LogEntry>,
}

impl SubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, url: &str) -> Option<&LogEntry> {
        self.entries.get(url)
    }

    /// URL 是否已经提交成功（不应再次提交）
    pub fn is_submitted(&self, url: &str) -> bool {
        self.entries.get(url).is_some_and(LogEntry::is_submitted)
    }

    /// 当前计数所属的日期
    pub fn effective_quota_date(&self) -> Option<NaiveDate> {
        self.quota_date
            .or_else(|| self.last_run.map(|ts| ts.date_naive()))
    }

    /// 记录一次成功提交
    pub fn record_success(&mut self, url: &str, response: Value, timestamp: DateTime<Local>) {
        self.entries.insert(
            url.to_string(),
            LogEntry::Submitted {
                timestamp,
                response,
            },
        );
        self.success_count += 1;
        self.submitted_today += 1;
        self.total_submitted += 1;
    }

    /// 记录一次 API 错误（不占用当日配额）
    pub fn record_error(&mut self, url: &str, error: impl Into<String>, timestamp: DateTime<Local>) {
        self.entries.insert(
            url.to_string(),
            LogEntry::Error {
                timestamp,
                error: error.into(),
            },
        );
        self.error_count += 1;
    }

    /// 按更新时间倒序取最近的条目
    pub fn recent_entries(&self, limit: usize) -> Vec<(&str, &LogEntry)> {
        let mut entries: Vec<(&str, &LogEntry)> = self
            .entries
            .iter()
            .map(|(url, entry)| (url.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| b.1.timestamp().cmp(&a.1.timestamp()));
        entries.truncate(limit);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_resubmission_overwrites_entry() {
        let mut log = SubmissionLog::new();
        log.record_error("https://x/a", "HttpError 500", at(9));
        assert_eq!(log.entry("https://x/a").unwrap().status(), EntryStatus::Error);
        assert!(!log.is_submitted("https://x/a"));

        log.record_success("https://x/a", json!({"urlNotificationMetadata": {}}), at(10));
        assert!(log.is_submitted("https://x/a"));
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.success_count, 1);
        assert_eq!(log.error_count, 1);
        assert_eq!(log.total_submitted, 1);
        assert_eq!(log.submitted_today, 1);
    }

    #[test]
    fn test_error_does_not_touch_quota() {
        let mut log = SubmissionLog::new();
        log.record_error("https://x/a", "denied", at(9));
        assert_eq!(log.submitted_today, 0);
        assert_eq!(log.total_submitted, 0);
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut log = SubmissionLog::new();
        log.last_run = Some(at(12) + Duration::milliseconds(345));
        log.quota_date = Some(at(12).date_naive());
        log.record_success(
            "https://x/a",
            json!({"urlNotificationMetadata": {"url": "https://x/a", "latestUpdate": {"type": "URL_UPDATED"}}}),
            at(11),
        );
        log.record_error("https://x/b", "Permission denied. Failed to verify the URL ownership.", at(11));

        let text = serde_json::to_string_pretty(&log).unwrap();
        let back: SubmissionLog = serde_json::from_str(&text).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_reads_log_without_quota_date() {
        let text = r#"{
            "last_run": "2026-03-14T10:00:00+00:00",
            "total_submitted": 3,
            "success_count": 3,
            "error_count": 1,
            "submitted_today": 3,
            "urls": {
                "https://x/a": {"status": "error", "timestamp": "2026-03-14T09:00:00+00:00", "error": "boom"}
            }
        }"#;
        let log: SubmissionLog = serde_json::from_str(text).unwrap();
        assert_eq!(log.quota_date, None);
        assert_eq!(
            log.effective_quota_date(),
            log.last_run.map(|ts| ts.date_naive())
        );
        assert_eq!(log.entry("https://x/a").unwrap().status(), EntryStatus::Error);
    }

    #[test]
    fn test_reads_offset_less_timestamps() {
        let text = r#"{
            "last_run": "2026-03-14T10:00:00.123456",
            "total_submitted": 1,
            "success_count": 1,
            "error_count": 0,
            "submitted_today": 1,
            "urls": {
                "https://x/a": {"status": "submitted", "timestamp": "2026-03-14T09:59:58.654321", "response": {}}
            }
        }"#;
        let log: SubmissionLog = serde_json::from_str(text).unwrap();
        assert_eq!(log.quota_date, None);
        assert_eq!(
            log.effective_quota_date(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
        let entry = log.entry("https://x/a").unwrap();
        assert!(entry.is_submitted());
        assert_eq!(entry.timestamp().date_naive(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn test_reads_fresh_log_with_null_last_run() {
        let text = r#"{"last_run": null, "total_submitted": 0, "success_count": 0, "error_count": 0, "urls": {}}"#;
        let log: SubmissionLog = serde_json::from_str(text).unwrap();
        assert_eq!(log, SubmissionLog::new());
    }

    #[test]
    fn test_recent_entries_newest_first() {
        let mut log = SubmissionLog::new();
        for (i, hour) in [3, 7, 5].iter().enumerate() {
            log.record_success(&format!("https://x/{i}"), json!({}), at(*hour));
        }
        let recent = log.recent_entries(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].0, "https://x/1");
        assert_eq!(recent[1].0, "https://x/2");
    }
}
