//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，未设置时按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用不会报错（测试中可以多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📦 运行模式: {:?}", config.service_mode);
    info!(
        "⏱️ 题库调用超时: {}ms, 最多尝试 {} 次",
        config.catalog_timeout_ms, config.catalog_max_retries
    );
    info!("📝 提交校验策略: {:?}", config.submission_policy);
    info!("{}", "=".repeat(60));
}

/// 记录服务监听地址
///
/// # 参数
/// - `service`: 服务名称
/// - `addr`: 实际监听地址
pub fn log_listening(service: &str, addr: &std::net::SocketAddr) {
    info!("✓ {} 已启动: http://{}", service, addr);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
