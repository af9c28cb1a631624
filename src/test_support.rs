//! 单元测试用的假索引 API

use crate::clients::{ChangeType, IndexingApi};
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// 预设的响应
#[derive(Debug, Clone, Copy)]
pub enum FakeReply {
    Rejected(u16),
    Unreachable,
}

/// 记录调用顺序，按 URL 返回预设结果（默认成功）
#[derive(Default)]
pub struct FakeIndexingApi {
    replies: HashMap<String, FakeReply>,
    calls: Mutex<Vec<String>>,
}

impl FakeIndexingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: FakeReply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexingApi for FakeIndexingApi {
    async fn submit(&self, url: &str, change_type: ChangeType) -> Result<Value, ApiError> {
        assert_eq!(change_type, ChangeType::UrlUpdated);
        self.calls.lock().unwrap().push(url.to_string());
        match self.replies.get(url) {
            None => Ok(json!({
                "urlNotificationMetadata": {"url": url, "latestUpdate": {"url": url, "type": "URL_UPDATED"}}
            })),
            Some(FakeReply::Rejected(code)) => Err(ApiError::BadResponse {
                endpoint: "fake".to_string(),
                code: *code,
                message: format!("rejected with {code}"),
            }),
            Some(FakeReply::Unreachable) => Err(ApiError::request_failed(
                "fake",
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
            )),
        }
    }
}
