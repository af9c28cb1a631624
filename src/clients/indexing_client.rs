/// Google Indexing API 客户端
///
/// 封装 `urlNotifications:publish` 调用，每次调用只提交一个 URL
use crate::clients::auth::{Credentials, TokenProvider};
use crate::config::Config;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const PUBLISH_PATH: &str = "/v3/urlNotifications:publish";

/// 通知类型（本系统只发送更新通知）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    UrlUpdated,
}

/// 索引提交接口
///
/// 成功时返回 API 原始响应；`ApiError::BadResponse` 表示 API 拒绝了该 URL，
/// 其他错误表示请求本身没有完成。
#[async_trait]
pub trait IndexingApi: Send + Sync {
    async fn submit(&self, url: &str, change_type: ChangeType) -> Result<Value, ApiError>;
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    change_type: ChangeType,
}

/// 索引 API 客户端
pub struct IndexingClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: TokenProvider,
}

impl IndexingClient {
    /// 创建新的索引客户端
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::request_failed("client", e))?;
        Ok(Self::with_http(http, &config.indexing_api_base_url, credentials))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PUBLISH_PATH),
            tokens: TokenProvider::new(credentials, http.clone()),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IndexingApi for IndexingClient {
    async fn submit(&self, url: &str, change_type: ChangeType) -> Result<Value, ApiError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| ApiError::request_failed("token", e))?;

        let body = PublishRequest { url, change_type };
        debug!("提交索引请求: {}", url);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;

        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint: self.endpoint.clone(),
                code: status.as_u16(),
                message: extract_error_message(&text).unwrap_or(text),
            });
        }

        let payload: Value = serde_json::from_str(&text).map_err(|e| ApiError::JsonParseFailed {
            source: Box::new(e),
        })?;
        debug!("索引请求结果: {}", payload);
        Ok(payload)
    }
}

/// 提取 Google 错误响应中的 `error.message`
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
