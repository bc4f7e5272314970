//! 测验存储 - 基础设施层

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{NewQuiz, Quiz, QuizId};

/// 测验存储
///
/// 测验创建后不再修改，因此只有插入和查询。
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn insert(&self, quiz: NewQuiz) -> AppResult<Quiz>;

    async fn get(&self, id: QuizId) -> AppResult<Option<Quiz>>;

    /// 全部测验，按 id 升序
    async fn all(&self) -> AppResult<Vec<Quiz>>;
}

/// 内存测验存储
#[derive(Default)]
pub struct InMemoryQuizStore {
    inner: RwLock<QuizTable>,
}

#[derive(Default)]
struct QuizTable {
    next_id: QuizId,
    rows: BTreeMap<QuizId, Quiz>,
}

impl InMemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn insert(&self, quiz: NewQuiz) -> AppResult<Quiz> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let quiz = Quiz {
            id: table.next_id,
            title: quiz.title,
            question_ids: quiz.question_ids,
        };
        table.rows.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn get(&self, id: QuizId) -> AppResult<Option<Quiz>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Quiz>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }
}
