use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// 运行哪些服务
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceMode {
    /// 只运行题库服务
    Catalog,
    /// 只运行测验服务（通过 HTTP 调用题库服务）
    Quiz,
    /// 同一进程内运行两个服务
    All,
}

impl FromStr for ServiceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(ServiceMode::Catalog),
            "quiz" => Ok(ServiceMode::Quiz),
            "all" => Ok(ServiceMode::All),
            _ => Err(ConfigError::InvalidValue {
                field: "SERVICE_MODE".to_string(),
                reason: format!("未知模式 '{}'，可选 catalog / quiz / all", s),
            }),
        }
    }
}

/// 提交答案时是否校验题目属于该测验
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPolicy {
    /// 不校验，测验 id 仅作参考
    Advisory,
    /// 拒绝不属于该测验的题目 id
    Strict,
}

impl FromStr for SubmissionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(SubmissionPolicy::Advisory),
            "strict" => Ok(SubmissionPolicy::Strict),
            _ => Err(ConfigError::InvalidValue {
                field: "SUBMISSION_POLICY".to_string(),
                reason: format!("未知策略 '{}'，可选 advisory / strict", s),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    pub service_mode: ServiceMode,
    /// 题库服务监听地址
    pub catalog_bind_addr: String,
    /// 测验服务监听地址
    pub quiz_bind_addr: String,
    // --- 题库服务调用配置 ---
    pub catalog_base_url: String,
    pub catalog_timeout_ms: u64,
    pub catalog_max_retries: u32,
    pub catalog_retry_backoff_ms: u64,
    pub submission_policy: SubmissionPolicy,
    /// 启动时导入的题目 TOML 文件
    pub seed_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_mode: ServiceMode::All,
            catalog_bind_addr: "127.0.0.1:8080".to_string(),
            quiz_bind_addr: "127.0.0.1:8090".to_string(),
            catalog_base_url: "http://127.0.0.1:8080".to_string(),
            catalog_timeout_ms: 5000,
            catalog_max_retries: 3,
            catalog_retry_backoff_ms: 200,
            submission_policy: SubmissionPolicy::Advisory,
            seed_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    ///
    /// 设置了但无法解析的值会返回错误，而不是悄悄回退到默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        let config = Self {
            service_mode: parse_env("SERVICE_MODE", "catalog|quiz|all")?
                .unwrap_or(default.service_mode),
            catalog_bind_addr: std::env::var("CATALOG_BIND_ADDR")
                .unwrap_or(default.catalog_bind_addr),
            quiz_bind_addr: std::env::var("QUIZ_BIND_ADDR").unwrap_or(default.quiz_bind_addr),
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or(default.catalog_base_url),
            catalog_timeout_ms: parse_env("CATALOG_TIMEOUT_MS", "u64")?
                .unwrap_or(default.catalog_timeout_ms),
            catalog_max_retries: parse_env("CATALOG_MAX_RETRIES", "u32")?
                .unwrap_or(default.catalog_max_retries),
            catalog_retry_backoff_ms: parse_env("CATALOG_RETRY_BACKOFF_MS", "u64")?
                .unwrap_or(default.catalog_retry_backoff_ms),
            submission_policy: parse_env("SUBMISSION_POLICY", "advisory|strict")?
                .unwrap_or(default.submission_policy),
            seed_file: std::env::var("QUESTION_SEED_FILE").ok().or(default.seed_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验配置项
    ///
    /// 只校验当前模式会监听的地址
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut bind_addrs = Vec::new();
        if self.service_mode != ServiceMode::Quiz {
            bind_addrs.push(("CATALOG_BIND_ADDR", &self.catalog_bind_addr));
        }
        if self.service_mode != ServiceMode::Catalog {
            bind_addrs.push(("QUIZ_BIND_ADDR", &self.quiz_bind_addr));
        }
        for (field, addr) in bind_addrs {
            addr.parse::<SocketAddr>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{}' 不是合法地址: {}", addr, e),
                })?;
        }
        if self.catalog_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "CATALOG_TIMEOUT_MS".to_string(),
                reason: "超时时间必须大于 0".to_string(),
            });
        }
        if self.catalog_max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "CATALOG_MAX_RETRIES".to_string(),
                reason: "至少需要尝试 1 次".to_string(),
            });
        }
        Ok(())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn catalog_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.catalog_retry_backoff_ms)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
