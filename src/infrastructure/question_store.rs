//! 题目存储 - 基础设施层
//!
//! 持有题目数据，只暴露"存 / 取 / 按分类查"能力

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{NewQuestion, Question, QuestionId};

/// 题目存储
///
/// 职责：
/// - 分配题目 id 并持久化
/// - 按 id / 分类查询
/// - 不做抽样、不做计分、不做答案脱敏
///
/// 所有方法都返回 `AppResult`，存储不可用时由实现返回 `UpstreamUnavailable`。
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 保存新题目并返回带 id 的完整记录
    async fn insert(&self, question: NewQuestion) -> AppResult<Question>;

    /// 按 id 查询，不存在时返回 `None`
    async fn get(&self, id: QuestionId) -> AppResult<Option<Question>>;

    /// 全部题目，按 id 升序
    async fn all(&self) -> AppResult<Vec<Question>>;

    /// 分类完全匹配（区分大小写）的题目
    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Question>>;

    /// 分类完全匹配的题目 id
    async fn ids_by_category(&self, category: &str) -> AppResult<Vec<QuestionId>> {
        Ok(self
            .find_by_category(category)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect())
    }
}

/// 内存题目存储
#[derive(Default)]
pub struct InMemoryQuestionStore {
    inner: RwLock<QuestionTable>,
}

#[derive(Default)]
struct QuestionTable {
    next_id: QuestionId,
    rows: BTreeMap<QuestionId, Question>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn insert(&self, question: NewQuestion) -> AppResult<Question> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let question = question.with_id(table.next_id);
        table.rows.insert(question.id, question.clone());
        Ok(question)
    }

    async fn get(&self, id: QuestionId) -> AppResult<Option<Question>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Question>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Question>> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn ids_by_category(&self, category: &str) -> AppResult<Vec<QuestionId>> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .filter(|q| q.category == category)
            .map(|q| q.id)
            .collect())
    }
}
