//! 每日配额 - 业务能力层
//!
//! 拆成两步：先做日期切换（有副作用），再做纯判断。

use crate::models::SubmissionLog;
use chrono::NaiveDate;

/// 如果计数所属日期不是今天，清零 `submitted_today` 并记录今天的日期
///
/// 同一天内重复调用不会再次清零。
pub fn rollover_if_new_day(log: &mut SubmissionLog, today: NaiveDate) -> bool {
    if log.effective_quota_date() == Some(today) {
        log.quota_date = Some(today);
        return false;
    }
    log.submitted_today = 0;
    log.quota_date = Some(today);
    true
}

/// 今天是否还有剩余配额
pub fn has_quota_remaining(log: &SubmissionLog, daily_limit: u32) -> bool {
    log.submitted_today < daily_limit
}

/// 今天剩余的配额
pub fn remaining_quota(log: &SubmissionLog, daily_limit: u32) -> u32 {
    daily_limit.saturating_sub(log.submitted_today)
}
