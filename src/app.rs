use crate::api;
use crate::clients::{CatalogApi, HttpCatalogClient, LocalCatalog};
use crate::config::{Config, ServiceMode};
use crate::infrastructure::{InMemoryQuestionStore, InMemoryQuizStore};
use crate::models::load_question_seed;
use crate::orchestrator::QuizOrchestrator;
use crate::services::QuestionCatalog;
use crate::utils::logging::log_startup;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 应用主结构
///
/// 按运行模式持有题库服务和（或）测验编排器
pub struct App {
    config: Config,
    catalog: Option<Arc<QuestionCatalog>>,
    orchestrator: Option<Arc<QuizOrchestrator>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let catalog = match config.service_mode {
            ServiceMode::Catalog | ServiceMode::All => Some(build_catalog(&config).await?),
            ServiceMode::Quiz => None,
        };

        let orchestrator = match (&config.service_mode, &catalog) {
            (ServiceMode::Catalog, _) => None,
            // 同进程运行时直接调用题库，不经过网络
            (ServiceMode::All, Some(catalog)) => Some(build_orchestrator(
                &config,
                Arc::new(LocalCatalog::new(catalog.clone())),
            )),
            _ => {
                let client = HttpCatalogClient::new(&config)
                    .context("无法创建题库服务客户端")?;
                info!("🔗 题库服务地址: {}", config.catalog_base_url);
                Some(build_orchestrator(&config, Arc::new(client)))
            }
        };

        Ok(Self {
            config,
            catalog,
            orchestrator,
        })
    }

    /// 运行应用主逻辑，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let catalog_server = async {
            match &self.catalog {
                Some(catalog) => {
                    let listener = bind(&self.config.catalog_bind_addr).await?;
                    api::serve(
                        "题库服务",
                        listener,
                        api::catalog_router(catalog.clone()),
                    )
                    .await
                    .context("题库服务异常退出")
                }
                None => Ok(()),
            }
        };

        let quiz_server = async {
            match &self.orchestrator {
                Some(orchestrator) => {
                    let listener = bind(&self.config.quiz_bind_addr).await?;
                    api::serve(
                        "测验服务",
                        listener,
                        api::quiz_router(orchestrator.clone()),
                    )
                    .await
                    .context("测验服务异常退出")
                }
                None => Ok(()),
            }
        };

        futures::future::try_join(catalog_server, quiz_server).await?;
        info!("👋 服务已停止");
        Ok(())
    }
}

/// 创建题库服务，配置了种子文件时先导入题目
async fn build_catalog(config: &Config) -> Result<Arc<QuestionCatalog>> {
    let catalog = Arc::new(QuestionCatalog::new(Arc::new(InMemoryQuestionStore::new())));

    if let Some(seed_file) = &config.seed_file {
        let questions = load_question_seed(Path::new(seed_file)).await?;
        catalog
            .import(questions)
            .await
            .with_context(|| format!("导入题库种子失败: {}", seed_file))?;
    }

    Ok(catalog)
}

fn build_orchestrator(config: &Config, catalog: Arc<dyn CatalogApi>) -> Arc<QuizOrchestrator> {
    Arc::new(QuizOrchestrator::new(
        catalog,
        Arc::new(InMemoryQuizStore::new()),
        config.submission_policy,
    ))
}

async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法监听地址: {}", addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_per_mode() {
        let all = App::initialize(Config::default()).await.unwrap();
        assert!(all.catalog.is_some());
        assert!(all.orchestrator.is_some());

        let catalog_only = App::initialize(Config {
            service_mode: ServiceMode::Catalog,
            ..Config::default()
        })
        .await
        .unwrap();
        assert!(catalog_only.catalog.is_some());
        assert!(catalog_only.orchestrator.is_none());

        let quiz_only = App::initialize(Config {
            service_mode: ServiceMode::Quiz,
            ..Config::default()
        })
        .await
        .unwrap();
        assert!(quiz_only.catalog.is_none());
        assert!(quiz_only.orchestrator.is_some());
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails_startup() {
        let result = App::initialize(Config {
            seed_file: Some("does/not/exist.toml".to_string()),
            ..Config::default()
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_file_is_imported() {
        let seed = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/questions.toml");
        let app = App::initialize(Config {
            service_mode: ServiceMode::Catalog,
            seed_file: Some(seed.to_string_lossy().to_string()),
            ..Config::default()
        })
        .await
        .unwrap();

        let catalog = app.catalog.unwrap();
        assert!(!catalog.list_all().await.unwrap().is_empty());
        assert!(catalog
            .list_categories()
            .await
            .unwrap()
            .contains(&"geography".to_string()));
    }
}
