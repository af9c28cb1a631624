//! 提交上下文
//!
//! 封装"我正在提交本批第几个 URL"这一信息

use std::fmt::Display;

/// 单个 URL 的提交上下文
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 待提交的 URL
    pub url: String,

    /// 在本批中的位置（从1开始，仅用于日志显示）
    pub position: usize,

    /// 本批计划提交的数量
    pub batch_total: usize,

    /// 优先级分数
    pub priority_score: f64,
}

impl SubmissionCtx {
    pub fn new(url: String, position: usize, batch_total: usize, priority_score: f64) -> Self {
        Self {
            url,
            position,
            batch_total,
            priority_score,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{} 优先级#{:.2}] {}",
            self.position, self.batch_total, self.priority_score, self.url
        )
    }
}
