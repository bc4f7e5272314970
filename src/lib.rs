//! # Quiz Orchestration
//!
//! 按分类随机组卷、渲染题目（不含答案）、提交作答计分的两个协作服务
//!
//! ## 架构设计
//!
//! 题库服务（Question Catalog）和测验服务（Quiz Orchestrator）各自拥有互不相交的数据，
//! 测验服务通过请求/响应调用题库服务：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有数据，只暴露存取能力
//! - `QuestionStore` / `QuizStore` - 存储契约及内存实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 题库服务，正确答案的唯一持有者
//! - `QuestionCatalog` - 抽题、解析（答案脱敏）、计分
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - 测验服务访问题库的方式
//! - `LocalCatalog` - 同进程调用
//! - `HttpCatalogClient` - HTTP 调用（超时 + 退避重试）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 测验的创建、获取、提交
//!
//! ### ⑤ 接口层（API）
//! - `api/` - 两个服务的 HTTP 路由
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{CatalogApi, HttpCatalogClient, LocalCatalog};
pub use config::{Config, ServiceMode, SubmissionPolicy};
pub use error::{AppError, AppResult};
pub use models::{NewQuestion, Question, QuestionView, Quiz, SubmittedResponse};
pub use orchestrator::QuizOrchestrator;
pub use services::QuestionCatalog;
