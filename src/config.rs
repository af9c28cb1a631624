use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "indexing.toml";

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// Google 服务账号 JSON 密钥文件
    pub credentials_file: PathBuf,
    /// 预先签发的访问令牌（设置后优先于服务账号）
    pub access_token: Option<String>,
    /// URL 优先级列表（CSV）
    pub backlog_file: PathBuf,
    /// 提交日志（JSON）
    pub log_file: PathBuf,
    /// 报告输出文件
    pub report_file: PathBuf,
    /// 运行日志文件
    pub run_log_file: PathBuf,
    /// 每日提交上限
    pub daily_limit: u32,
    /// 每次运行处理的 URL 数量
    pub batch_size: usize,
    /// 两次请求之间的间隔（毫秒）
    pub pacing_delay_ms: u64,
    // --- 索引 API 配置 ---
    pub indexing_api_base_url: String,
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from("credentials.json"),
            access_token: None,
            backlog_file: PathBuf::from("url_priority_list.csv"),
            log_file: PathBuf::from("indexing_log.json"),
            report_file: PathBuf::from("indexing_report.txt"),
            run_log_file: PathBuf::from("indexing.log"),
            daily_limit: 200,
            batch_size: 10,
            pacing_delay_ms: 1000,
            indexing_api_base_url: "https://indexing.googleapis.com".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件中的可选覆盖项
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    credentials_file: Option<PathBuf>,
    access_token: Option<String>,
    backlog_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    report_file: Option<PathBuf>,
    run_log_file: Option<PathBuf>,
    daily_limit: Option<u32>,
    batch_size: Option<usize>,
    pacing_delay_ms: Option<u64>,
    indexing_api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 → TOML 配置文件（如果存在）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("INDEXING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = Self::from_file(Path::new(&path))?;
        let config = base.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载，文件不存在时返回默认配置
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        let default = Self::default();
        Ok(Self {
            credentials_file: file.credentials_file.unwrap_or(default.credentials_file),
            access_token: file.access_token.or(default.access_token),
            backlog_file: file.backlog_file.unwrap_or(default.backlog_file),
            log_file: file.log_file.unwrap_or(default.log_file),
            report_file: file.report_file.unwrap_or(default.report_file),
            run_log_file: file.run_log_file.unwrap_or(default.run_log_file),
            daily_limit: file.daily_limit.unwrap_or(default.daily_limit),
            batch_size: file.batch_size.unwrap_or(default.batch_size),
            pacing_delay_ms: file.pacing_delay_ms.unwrap_or(default.pacing_delay_ms),
            indexing_api_base_url: file.indexing_api_base_url.unwrap_or(default.indexing_api_base_url),
            request_timeout_secs: file.request_timeout_secs.unwrap_or(default.request_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 用环境变量覆盖已有配置
    fn apply_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            credentials_file: env_path("INDEXING_CREDENTIALS_FILE").unwrap_or(self.credentials_file),
            access_token: std::env::var("INDEXING_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()).or(self.access_token),
            backlog_file: env_path("INDEXING_BACKLOG_FILE").unwrap_or(self.backlog_file),
            log_file: env_path("INDEXING_LOG_FILE").unwrap_or(self.log_file),
            report_file: env_path("INDEXING_REPORT_FILE").unwrap_or(self.report_file),
            run_log_file: env_path("INDEXING_RUN_LOG_FILE").unwrap_or(self.run_log_file),
            daily_limit: env_parse("INDEXING_DAILY_LIMIT", "u32")?.unwrap_or(self.daily_limit),
            batch_size: env_parse("INDEXING_BATCH_SIZE", "usize")?.unwrap_or(self.batch_size),
            pacing_delay_ms: env_parse("INDEXING_PACING_DELAY_MS", "u64")?.unwrap_or(self.pacing_delay_ms),
            indexing_api_base_url: std::env::var("INDEXING_API_BASE_URL").unwrap_or(self.indexing_api_base_url),
            request_timeout_secs: env_parse("INDEXING_REQUEST_TIMEOUT_SECS", "u64")?.unwrap_or(self.request_timeout_secs),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "daily_limit".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 运行锁文件路径（与提交日志同目录）
    pub fn lock_file(&self) -> PathBuf {
        let mut name = self.log_file.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

fn env_path(var_name: &str) -> Option<PathBuf> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
        Err(_) => Ok(None),
    }
}
