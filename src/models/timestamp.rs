//! 提交日志中的时间字段
//!
//! 写出时总是带时区偏移（RFC 3339）。读入时同时接受不带偏移的
//! 本地时间（如 `2026-03-14T10:00:00.123456`），按本机时区解释。

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// 解析日志中的时间字符串
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Local>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Local));
    }
    let naive: NaiveDateTime = raw
        .parse()
        .map_err(|e| format!("无法解析时间 {:?}: {}", raw, e))?;
    // 夏令时回拨时取较早的那个时刻
    naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| format!("本地时区中不存在该时间: {:?}", raw))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
