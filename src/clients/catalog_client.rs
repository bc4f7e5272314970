//! 题库服务客户端
//!
//! 测验服务通过 [`CatalogApi`] 访问题库，既可以是同进程调用，也可以是 HTTP 调用
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ErrorBody};
use crate::models::{QuestionId, QuestionView, SubmittedResponse};
use crate::services::QuestionCatalog;

/// 上游服务名称（用于错误和日志）
pub const CATALOG_SERVICE: &str = "question-service";

/// 单次重试等待的上限
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// 测验服务依赖的题库能力
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// 从分类中随机抽取最多 `count` 个题目 id
    async fn sample_ids(&self, category: &str, count: usize) -> AppResult<Vec<QuestionId>>;

    /// 把题目 id 解析为不含答案的题目内容
    async fn resolve(&self, ids: &[QuestionId]) -> AppResult<Vec<QuestionView>>;

    /// 用标准答案计分
    async fn score(&self, responses: &[SubmittedResponse]) -> AppResult<u32>;
}

/// 同进程题库（直接调用 [`QuestionCatalog`]）
#[derive(Clone)]
pub struct LocalCatalog {
    catalog: Arc<QuestionCatalog>,
}

impl LocalCatalog {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogApi for LocalCatalog {
    async fn sample_ids(&self, category: &str, count: usize) -> AppResult<Vec<QuestionId>> {
        self.catalog.sample_ids(category, count).await
    }

    async fn resolve(&self, ids: &[QuestionId]) -> AppResult<Vec<QuestionView>> {
        self.catalog.resolve(ids).await
    }

    async fn score(&self, responses: &[SubmittedResponse]) -> AppResult<u32> {
        self.catalog.score(responses).await
    }
}

/// 题库 HTTP 客户端
///
/// - 每次请求有超时上限
/// - 网络错误、超时、503 按指数退避重试（三个接口都是幂等的）
/// - 404 / 400 等明确的失败直接返回，不重试
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpCatalogClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(
            &config.catalog_base_url,
            config.catalog_timeout(),
            config.catalog_max_retries,
            config.catalog_retry_backoff(),
        )
    }

    /// 使用自定义地址和重试参数创建
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::upstream_unavailable(CATALOG_SERVICE, e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            max_retries: max_retries.max(1),
            retry_backoff,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 第 `attempt` 次失败后的等待时间：`backoff * 2^attempt`，溢出时取上限
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }

    /// 发送请求（带重试逻辑）
    ///
    /// # 参数
    /// - `endpoint`: 接口路径（用于日志和错误）
    /// - `build`: 每次重试都重新构建请求
    async fn send_with_retry<T, F>(&self, endpoint: &str, build: F) -> AppResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match self.send_once(endpoint, build()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    warn!(
                        "⚠️ 调用 {} 失败 (尝试 {}/{}): {}",
                        endpoint,
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    last_error = Some(e);
                    if attempt + 1 < self.max_retries {
                        sleep(self.backoff_delay(attempt)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::upstream_unavailable(CATALOG_SERVICE, "没有发出任何请求")
        }))
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::upstream_unavailable(
                    CATALOG_SERVICE,
                    format!("请求超时 ({}ms)", self.timeout.as_millis()),
                )
            } else {
                AppError::upstream_unavailable(CATALOG_SERVICE, e)
            }
        })?;

        let status = response.status();
        debug!("{} 返回状态: {}", endpoint, status);

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AppError::UpstreamProtocol {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    message: format!("无法解析响应: {}", e),
                });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Err(AppError::UpstreamProtocol {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    message: format!("无法读取响应内容: {}", e),
                })
            }
        };
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error_body) => Err(AppError::from_body(
                CATALOG_SERVICE,
                endpoint,
                status.as_u16(),
                error_body,
            )),
            Err(_) if status == StatusCode::SERVICE_UNAVAILABLE => Err(
                AppError::upstream_unavailable(CATALOG_SERVICE, format!("{} 返回 503", endpoint)),
            ),
            Err(_) => Err(AppError::UpstreamProtocol {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn sample_ids(&self, category: &str, count: usize) -> AppResult<Vec<QuestionId>> {
        let endpoint = "Question/generate";
        let url = self.url(endpoint);
        let count = count.to_string();
        self.send_with_retry(endpoint, || {
            self.client
                .get(&url)
                .query(&[("categoryname", category), ("numofquestions", count.as_str())])
        })
        .await
    }

    async fn resolve(&self, ids: &[QuestionId]) -> AppResult<Vec<QuestionView>> {
        let endpoint = "Question/getQuestions";
        let url = self.url(endpoint);
        self.send_with_retry(endpoint, || self.client.post(&url).json(ids))
            .await
    }

    async fn score(&self, responses: &[SubmittedResponse]) -> AppResult<u32> {
        let endpoint = "Question/getscore";
        let url = self.url(endpoint);
        self.send_with_retry(endpoint, || self.client.post(&url).json(responses))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    /// 启动一个记录请求次数的题库替身，返回地址和计数器
    async fn spawn_stub<H, T>(path: &str, handler: H) -> (String, Arc<AtomicUsize>)
    where
        H: axum::handler::Handler<T, Arc<AtomicUsize>>,
        T: 'static,
    {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(path, post(handler))
            .with_state(hits.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        (format!("http://{}", addr), hits)
    }

    fn stub_client(base_url: String, max_retries: u32) -> HttpCatalogClient {
        HttpCatalogClient::with_base_url(
            base_url,
            Duration::from_secs(2),
            max_retries,
            Duration::from_millis(1),
        )
        .unwrap()
    }

    /// 获取一个当前没有监听的本地端口
    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_upstream_unavailable() {
        let client = HttpCatalogClient::with_base_url(
            closed_port_url().await,
            Duration::from_millis(500),
            2,
            Duration::from_millis(1),
        )
        .unwrap();

        let result = client.sample_ids("geography", 3).await;
        assert!(matches!(
            result,
            Err(AppError::UpstreamUnavailable { ref service, .. }) if service == CATALOG_SERVICE
        ));
    }

    #[tokio::test]
    async fn test_silent_catalog_times_out() {
        // 只接受连接、从不响应
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HttpCatalogClient::with_base_url(
            format!("http://{}", addr),
            Duration::from_millis(100),
            1,
            Duration::from_millis(1),
        )
        .unwrap();

        let result = client.resolve(&[1, 2]).await;
        match result {
            Err(AppError::UpstreamUnavailable { reason, .. }) => {
                assert!(reason.contains("超时"), "reason: {}", reason)
            }
            other => panic!("应该超时: {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn test_503_is_retried_until_success() {
        // 前两次返回 503，第三次返回分数
        async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> Response {
            if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                axum::http::StatusCode::SERVICE_UNAVAILABLE.into_response()
            } else {
                Json(7u32).into_response()
            }
        }

        let (url, hits) = spawn_stub("/Question/getscore", flaky).await;
        let client = stub_client(url, 3);

        let score = client.score(&[SubmittedResponse::new(1, "A")]).await;
        assert_eq!(score.unwrap(), 7);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_503_gives_up_after_max_retries() {
        async fn down(State(hits): State<Arc<AtomicUsize>>) -> Response {
            hits.fetch_add(1, Ordering::SeqCst);
            axum::http::StatusCode::SERVICE_UNAVAILABLE.into_response()
        }

        let (url, hits) = spawn_stub("/Question/getscore", down).await;
        let client = stub_client(url, 2);

        let result = client.score(&[SubmittedResponse::new(1, "A")]).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable { .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        async fn missing(State(hits): State<Arc<AtomicUsize>>) -> Response {
            hits.fetch_add(1, Ordering::SeqCst);
            AppError::question_not_found(vec![9]).into_response()
        }

        let (url, hits) = spawn_stub("/Question/getscore", missing).await;
        let client = stub_client(url, 3);

        let result = client.score(&[SubmittedResponse::new(9, "A")]).await;
        match result {
            Err(AppError::NotFound { ids, .. }) => assert_eq!(ids, vec![9]),
            other => panic!("应该是 NotFound: {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_error_is_not_retried() {
        async fn rejected(State(hits): State<Arc<AtomicUsize>>) -> Response {
            hits.fetch_add(1, Ordering::SeqCst);
            AppError::validation("数量不能为负数").into_response()
        }

        let (url, hits) = spawn_stub("/Question/getQuestions", rejected).await;
        let client = stub_client(url, 3);

        let result = client.resolve(&[1]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_read_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // 声明的长度比实际发送的内容长，读取响应体时连接被关闭
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
                    .await;
            }
        });

        let client = stub_client(format!("http://{}", addr), 1);
        match client.resolve(&[1]).await {
            Err(AppError::UpstreamProtocol {
                status, message, ..
            }) => {
                assert_eq!(status, 500);
                assert!(message.contains("无法读取响应内容"), "message: {}", message);
            }
            other => panic!("应该是 UpstreamProtocol: {:?}", other),
        }

        server.abort();
    }

    #[test]
    fn test_backoff_delay_saturates() {
        let client = stub_client("http://127.0.0.1:1".to_string(), 64);
        assert_eq!(client.backoff_delay(0), Duration::from_millis(1));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(8));
        assert_eq!(client.backoff_delay(40), MAX_BACKOFF);
        assert_eq!(client.backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpCatalogClient::with_base_url(
            "http://127.0.0.1:8080/",
            Duration::from_secs(1),
            0,
            Duration::from_millis(1),
        )
        .unwrap();
        assert_eq!(
            client.url("Question/generate"),
            "http://127.0.0.1:8080/Question/generate"
        );
        assert_eq!(client.max_retries, 1);
    }
}
