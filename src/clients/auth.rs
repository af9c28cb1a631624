/// Google 服务账号认证
///
/// 用服务账号私钥签发 JWT，再到 token_uri 换取访问令牌
use crate::config::Config;
use crate::error::{AppError, AuthError, FileError};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 索引 API 所需的 OAuth scope
pub const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// 令牌到期前提前刷新的秒数
const REFRESH_MARGIN_SECS: i64 = 60;

/// 服务账号 JSON 密钥中用到的字段
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// 已解析的服务账号
#[derive(Clone)]
pub struct ServiceAccount {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
}

impl ServiceAccount {
    /// 从 JSON 密钥文件加载，文件缺失或私钥无效都视为启动错误
    pub async fn from_file(path: &Path) -> Result<Self, AppError> {
        let display = path.display().to_string();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound { path: display }.into());
            }
            Err(e) => return Err(FileError::read_failed(display, e).into()),
        };
        let key: ServiceAccountKey =
            serde_json::from_str(&content).map_err(|e| AuthError::InvalidServiceAccount {
                path: display.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_key(key, &display)?)
    }

    pub fn from_key(key: ServiceAccountKey, source: &str) -> Result<Self, AuthError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AuthError::InvalidServiceAccount {
                path: source.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            signing_key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// 签发用于换取令牌的 JWT
    pub fn sign_assertion(&self, issued_at: i64) -> Result<String, AuthError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: INDEXING_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)?)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// 凭据来源
#[derive(Clone)]
pub enum Credentials {
    /// 服务账号密钥
    ServiceAccount(ServiceAccount),
    /// 预先签发的访问令牌
    AccessToken(String),
}

impl Credentials {
    /// 按配置解析凭据：`access_token` 优先，否则读取服务账号密钥文件
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        if let Some(token) = &config.access_token {
            info!("🔑 使用预设访问令牌");
            return Ok(Credentials::AccessToken(token.clone()));
        }
        if !tokio::fs::try_exists(&config.credentials_file).await.unwrap_or(false) {
            return Err(AuthError::MissingCredentials.into());
        }
        let account = ServiceAccount::from_file(&config.credentials_file).await?;
        info!("🔑 服务账号加载成功: {}", account.client_email());
        Ok(Credentials::ServiceAccount(account))
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// 访问令牌提供者，缓存令牌直到临近过期
pub struct TokenProvider {
    credentials: Credentials,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(credentials: Credentials, http: reqwest::Client) -> Self {
        Self {
            credentials,
            http,
            cached: Mutex::new(None),
        }
    }

    /// 获取有效的访问令牌
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let account = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(account) => account,
        };

        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - REFRESH_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange(account, now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange(&self, account: &ServiceAccount, now: i64) -> Result<CachedToken, AuthError> {
        debug!("正在换取访问令牌: {}", account.token_uri);
        let assertion = account.sign_assertion(now)?;

        let response = self
            .http
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::TokenExchangeFailed(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;
        debug!("访问令牌有效期: {} 秒", token.expires_in);
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}
