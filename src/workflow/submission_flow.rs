//! 单个 URL 提交流程 - 流程层
//!
//! 核心职责：调用一次索引 API，并把结果写进提交日志
//!
//! 结果分三种：
//! 1. 成功 → 记录 submitted，计入当日配额
//! 2. API 拒绝 → 记录 error，下次运行重试
//! 3. 请求未完成 → 日志不变，URL 保持待处理

use chrono::Local;
use tracing::{error, info, warn};

use crate::clients::{ChangeType, IndexingApi};
use crate::models::SubmissionLog;
use crate::utils::logging::truncate_text;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 单个 URL 的提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 提交成功
    Submitted,
    /// API 返回错误，已记录
    Failed(String),
    /// 请求未完成，未记录
    Deferred(String),
}

impl SubmitOutcome {
    /// 是否写入了提交日志
    pub fn is_recorded(&self) -> bool {
        !matches!(self, SubmitOutcome::Deferred(_))
    }
}

/// URL 提交流程
///
/// - 不持有提交日志，由调用方传入
/// - 不关心配额和顺序
/// - 单个 URL 的任何错误都不会向上传播
pub struct SubmissionFlow<'a> {
    api: &'a dyn IndexingApi,
}

impl<'a> SubmissionFlow<'a> {
    pub fn new(api: &'a dyn IndexingApi) -> Self {
        Self { api }
    }

    /// 提交单个 URL 并更新日志
    pub async fn submit_one(&self, log: &mut SubmissionLog, ctx: &SubmissionCtx) -> SubmitOutcome {
        info!("🔄 处理中 {}", ctx);

        match self.api.submit(&ctx.url, ChangeType::UrlUpdated).await {
            Ok(payload) => {
                info!("✅ 索引请求成功: {}", ctx.url);
                log.record_success(&ctx.url, payload, Local::now());
                SubmitOutcome::Submitted
            }
            Err(e) if e.is_structured() => {
                let message = e.to_string();
                error!("❌ 索引请求失败: {} - {}", ctx.url, truncate_text(&message, 200));
                log.record_error(&ctx.url, message.clone(), Local::now());
                SubmitOutcome::Failed(message)
            }
            Err(e) => {
                warn!("⚠️ 请求未完成，下次运行重试: {} - {}", ctx.url, e);
                SubmitOutcome::Deferred(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;
    use crate::test_support::{FakeIndexingApi, FakeReply};

    fn ctx(url: &str) -> SubmissionCtx {
        SubmissionCtx::new(url.to_string(), 1, 1, 0.9)
    }

    #[tokio::test]
    async fn test_success_updates_all_counters() {
        let api = FakeIndexingApi::new();
        let mut log = SubmissionLog::new();

        let outcome = SubmissionFlow::new(&api).submit_one(&mut log, &ctx("https://x/a")).await;

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(log.entry("https://x/a").unwrap().status(), EntryStatus::Submitted);
        assert_eq!((log.success_count, log.submitted_today, log.total_submitted), (1, 1, 1));
        assert_eq!(log.error_count, 0);
        assert_eq!(api.calls(), vec!["https://x/a".to_string()]);
    }

    #[tokio::test]
    async fn test_api_error_recorded_without_quota() {
        let api = FakeIndexingApi::new().reply("https://x/a", FakeReply::Rejected(403));
        let mut log = SubmissionLog::new();

        let outcome = SubmissionFlow::new(&api).submit_one(&mut log, &ctx("https://x/a")).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(log.entry("https://x/a").unwrap().status(), EntryStatus::Error);
        assert_eq!(log.error_count, 1);
        assert_eq!((log.success_count, log.submitted_today, log.total_submitted), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_transport_error_leaves_log_untouched() {
        let api = FakeIndexingApi::new().reply("https://x/a", FakeReply::Unreachable);
        let mut log = SubmissionLog::new();

        let outcome = SubmissionFlow::new(&api).submit_one(&mut log, &ctx("https://x/a")).await;

        assert!(matches!(outcome, SubmitOutcome::Deferred(_)));
        assert!(!outcome.is_recorded());
        assert_eq!(log, SubmissionLog::new());
    }

    #[tokio::test]
    async fn test_error_entry_is_overwritten_on_retry() {
        let api = FakeIndexingApi::new();
        let mut log = SubmissionLog::new();
        log.record_error("https://x/a", "earlier failure", Local::now());

        SubmissionFlow::new(&api).submit_one(&mut log, &ctx("https://x/a")).await;

        assert!(log.is_submitted("https://x/a"));
        assert_eq!(log.error_count, 1);
        assert_eq!(log.success_count, 1);
    }
}
