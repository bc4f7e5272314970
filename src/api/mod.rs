//! API 模块
//!
//! 两个服务的 HTTP 接口，路径与原有前端保持兼容

pub mod catalog_routes;
pub mod quiz_routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, warn};

use crate::error::AppError;
use crate::utils::logging::log_listening;

pub use catalog_routes::router as catalog_router;
pub use quiz_routes::router as quiz_router;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("❌ 请求失败: {}", self);
        } else {
            warn!("⚠️ 请求失败: {}", self);
        }
        (status, Json(self.to_body())).into_response()
    }
}

/// 把提取器拒绝（请求体、查询参数、路径格式错误）转为参数错误
pub(crate) fn bad_request(rejection: impl std::fmt::Display) -> AppError {
    AppError::validation(format!("请求格式错误: {}", rejection))
}

/// 在已绑定的监听器上运行服务，直到收到 Ctrl+C
///
/// # 参数
/// - `name`: 服务名称（用于日志）
/// - `listener`: 已绑定的监听器
/// - `router`: 路由
pub async fn serve(name: &str, listener: TcpListener, router: Router) -> std::io::Result<()> {
    log_listening(name, &listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
}
