use serde::{Deserialize, Serialize};

/// 待提交的 URL 及其优先级
///
/// 由外部的 URL 优先级生成器提供，控制器只读取不修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogItem {
    pub url: String,
    pub priority_score: f64,
}

impl BacklogItem {
    pub fn new(url: impl Into<String>, priority_score: f64) -> Self {
        Self {
            url: url.into(),
            priority_score,
        }
    }
}
