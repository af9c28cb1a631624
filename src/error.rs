use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 索引 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 认证错误
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 索引 API 调用错误
///
/// `BadResponse` 是结构化错误（API 明确拒绝了该 URL），会被记录到提交日志；
/// 其余变体属于传输层错误，URL 保持待处理状态，下次运行时重试。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): code={code}, message={message}")]
    BadResponse {
        endpoint: String,
        code: u16,
        message: String,
    },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    /// 是否为结构化的 API 错误
    pub fn is_structured(&self) -> bool {
        matches!(self, ApiError::BadResponse { .. })
    }
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 未配置任何凭据
    #[error("未配置凭据: 请设置 credentials_file 或 INDEXING_ACCESS_TOKEN")]
    MissingCredentials,
    /// 服务账号密钥无效
    #[error("服务账号密钥无效 ({path}): {reason}")]
    InvalidServiceAccount { path: String, reason: String },
    /// JWT 签名失败
    #[error("JWT签名失败: {0}")]
    SigningFailed(#[from] jsonwebtoken::errors::Error),
    /// 获取访问令牌失败
    #[error("获取访问令牌失败: {0}")]
    TokenExchangeFailed(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 日志文件损坏
    #[error("日志文件损坏 ({path}): {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 另一个进程正在运行
    #[error("另一个进程正在使用 {path}，请等待其结束后再运行")]
    Locked { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("配置文件读取失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值无效
    #[error("配置项 {field} 无效: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建网络请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_error_classification() {
        let structured = ApiError::BadResponse {
            endpoint: "urlNotifications:publish".to_string(),
            code: 403,
            message: "Permission denied".to_string(),
        };
        assert!(structured.is_structured());

        let transport = ApiError::request_failed(
            "urlNotifications:publish",
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"),
        );
        assert!(!transport.is_structured());
    }

    #[test]
    fn test_app_error_wraps_api_error() {
        let err: AppError = ApiError::BadResponse {
            endpoint: "publish".to_string(),
            code: 429,
            message: "Quota exceeded".to_string(),
        }
        .into();
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("Quota exceeded"));
    }
}
