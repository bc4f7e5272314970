//! 编排层（Orchestration）
//!
//! ## 层次关系
//!
//! ```text
//! api::quiz_routes (HTTP 接口)
//!     ↓
//! orchestrator::QuizOrchestrator (测验生命周期)
//!     ↓
//! clients::CatalogApi (同进程 / HTTP)
//!     ↓
//! services::QuestionCatalog (抽题 / 解析 / 计分)
//!     ↓
//! infrastructure (QuestionStore / QuizStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一事实来源**：对错只由题库判断，编排层只转发和汇总
//! 2. **弱引用**：测验里的题目 id 可能在题库中已不存在，解析时显式报告
//! 3. **向下依赖**：编排层 → clients → services → infrastructure

pub mod quiz_orchestrator;

pub use quiz_orchestrator::QuizOrchestrator;
