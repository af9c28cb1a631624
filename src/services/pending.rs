//! 待提交 URL 筛选 - 业务能力层

use crate::models::{BacklogItem, SubmissionLog};
use std::cmp::Ordering;
use std::collections::HashSet;

/// 从外部 URL 列表中挑出需要提交的 URL
///
/// - 已成功提交的 URL 被过滤掉；未记录或上次失败的 URL 保留
/// - 同一个 URL 在列表中出现多次时只保留第一次
/// - 按 `priority_score` 降序稳定排序，分数相同保持原顺序，NaN 排在最后
pub fn select_pending(log: &SubmissionLog, backlog: &[BacklogItem]) -> Vec<BacklogItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pending = Vec::new();
    for item in backlog {
        if log.is_submitted(&item.url) || !seen.insert(item.url.as_str()) {
            continue;
        }
        pending.push(item.clone());
    }

    // sort_by 是稳定排序
    pending.sort_by(|a, b| compare_priority(b.priority_score, a.priority_score));
    pending
}

fn compare_priority(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
