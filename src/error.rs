//! 错误类型
//!
//! 所有可能失败的操作都返回 `AppResult<T>`，不再用"空结果 + 错误状态码"代替错误。
//! 错误可以序列化为 [`ErrorBody`] 跨服务传递，再由客户端还原为同一个 [`AppError`]。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 引用的 id 在存储中不存在（批量操作会列出全部缺失的 id）
    #[error("{entity} 不存在: {ids:?}")]
    NotFound { entity: String, ids: Vec<u32> },

    /// 上游服务无法访问、超时，或其存储不可用
    #[error("上游服务不可用 ({service}): {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    /// 上游服务返回了无法识别的响应
    #[error("上游响应异常 ({endpoint}): status={status}, message={message}")]
    UpstreamProtocol {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// 请求参数不合法
    #[error("参数错误: {0}")]
    Validation(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
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

    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 错误分类，用于跨服务传输
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    UpstreamUnavailable,
    UpstreamProtocol,
    Validation,
    Internal,
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl AppError {
    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            AppError::UpstreamProtocol { .. } => ErrorKind::UpstreamProtocol,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Config(_) => ErrorKind::Internal,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::UpstreamUnavailable => 503,
            ErrorKind::UpstreamProtocol => 502,
            ErrorKind::Internal => 500,
        }
    }

    /// 转换为可传输的错误响应体
    pub fn to_body(&self) -> ErrorBody {
        let (missing_ids, entity) = match self {
            AppError::NotFound { entity, ids } => (ids.clone(), Some(entity.clone())),
            _ => (Vec::new(), None),
        };
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
            missing_ids,
            entity,
        }
    }

    /// 从上游返回的错误响应体还原错误
    ///
    /// # 参数
    /// - `service`: 上游服务名称（用于 UpstreamUnavailable）
    /// - `endpoint`: 请求的接口
    /// - `status`: HTTP 状态码
    /// - `body`: 错误响应体
    pub fn from_body(service: &str, endpoint: &str, status: u16, body: ErrorBody) -> Self {
        match body.kind {
            ErrorKind::NotFound => AppError::NotFound {
                entity: body.entity.unwrap_or_else(|| "Question".to_string()),
                ids: body.missing_ids,
            },
            ErrorKind::Validation => AppError::Validation(body.message),
            ErrorKind::UpstreamUnavailable => AppError::UpstreamUnavailable {
                service: service.to_string(),
                reason: body.message,
            },
            ErrorKind::UpstreamProtocol | ErrorKind::Internal => AppError::UpstreamProtocol {
                endpoint: endpoint.to_string(),
                status,
                message: body.message,
            },
        }
    }

    /// 上游返回 503 或请求未能送达时可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::UpstreamUnavailable { .. })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建题目不存在错误
    pub fn question_not_found(ids: Vec<u32>) -> Self {
        AppError::NotFound {
            entity: "Question".to_string(),
            ids,
        }
    }

    /// 创建测验不存在错误
    pub fn quiz_not_found(id: u32) -> Self {
        AppError::NotFound {
            entity: "Quiz".to_string(),
            ids: vec![id],
        }
    }

    /// 创建上游不可用错误
    pub fn upstream_unavailable(service: impl Into<String>, reason: impl ToString) -> Self {
        AppError::UpstreamUnavailable {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建参数错误
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
