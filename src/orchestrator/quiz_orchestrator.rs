//! 测验编排器 - 编排层
//!
//! ## 职责
//!
//! 持有测验记录，题目相关的一切都委托给题库服务：
//!
//! 1. **创建测验**：向题库抽取题目 id → 保存为新测验
//! 2. **获取题目**：读取测验的 id 序列 → 由题库解析为不含答案的内容
//! 3. **提交作答**：把作答转发给题库计分，自己从不判断对错
//!
//! ## 设计特点
//!
//! - 无共享可变状态，所有状态都在两个存储里，请求之间互不影响
//! - 题库不可用时返回 `UpstreamUnavailable`，不会返回空测验

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::CatalogApi;
use crate::config::SubmissionPolicy;
use crate::error::{AppError, AppResult};
use crate::infrastructure::QuizStore;
use crate::models::{
    CreateQuizRequest, NewQuiz, QuestionId, QuestionView, Quiz, QuizId, QuizSummary,
    SubmittedResponse,
};
use crate::services::catalog_service::validate_count;

/// 测验编排器
pub struct QuizOrchestrator {
    catalog: Arc<dyn CatalogApi>,
    quizzes: Arc<dyn QuizStore>,
    submission_policy: SubmissionPolicy,
}

impl QuizOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        quizzes: Arc<dyn QuizStore>,
        submission_policy: SubmissionPolicy,
    ) -> Self {
        Self {
            catalog,
            quizzes,
            submission_policy,
        }
    }

    /// 创建测验
    ///
    /// 题库中匹配的题目不足 `count` 个时，测验只包含实际抽到的题目，不补齐也不重抽。
    ///
    /// # 参数
    /// - `category`: 分类（区分大小写）
    /// - `count`: 请求的题目数量，负数视为参数错误
    /// - `title`: 测验标题
    ///
    /// # 返回
    /// 返回保存后的测验
    pub async fn create_quiz(&self, category: &str, count: i64, title: &str) -> AppResult<Quiz> {
        let count = validate_count(count)?;
        if category.trim().is_empty() {
            return Err(AppError::validation("分类不能为空"));
        }
        if title.trim().is_empty() {
            return Err(AppError::validation("测验标题不能为空"));
        }

        let question_ids = self.catalog.sample_ids(category, count).await?;
        if question_ids.len() < count {
            warn!(
                "⚠️ 分类 '{}' 只抽到 {}/{} 个题目",
                category,
                question_ids.len(),
                count
            );
        }

        let quiz = self
            .quizzes
            .insert(NewQuiz {
                title: title.to_string(),
                question_ids,
            })
            .await?;

        info!(
            "✓ 创建测验 #{} '{}'，共 {} 个题目",
            quiz.id,
            quiz.title,
            quiz.question_ids.len()
        );
        Ok(quiz)
    }

    /// 使用请求体创建测验
    pub async fn create_quiz_from(&self, request: &CreateQuizRequest) -> AppResult<Quiz> {
        self.create_quiz(&request.category, request.count, &request.title)
            .await
    }

    /// 获取测验题目（不含答案）
    ///
    /// 按题库返回的顺序原样返回，不重新排序。测验不存在时返回 `NotFound`。
    pub async fn get_quiz_questions(&self, quiz_id: QuizId) -> AppResult<Vec<QuestionView>> {
        let quiz = self.load_quiz(quiz_id).await?;
        let views = self.catalog.resolve(&quiz.question_ids).await?;

        info!("📖 测验 #{} 返回 {} 个题目", quiz_id, views.len());
        Ok(views)
    }

    /// 提交作答并返回得分
    ///
    /// - `Advisory`：作答原样转发给题库计分，不读取测验
    /// - `Strict`：测验必须存在，且所有作答的题目 id 都必须属于该测验
    pub async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        responses: &[SubmittedResponse],
    ) -> AppResult<u32> {
        if self.submission_policy == SubmissionPolicy::Strict {
            let quiz = self.load_quiz(quiz_id).await?;
            let foreign: Vec<QuestionId> = responses
                .iter()
                .map(|r| r.id)
                .filter(|id| !quiz.contains(*id))
                .collect();
            if !foreign.is_empty() {
                warn!("⚠️ 测验 #{} 收到不属于它的题目: {:?}", quiz_id, foreign);
                return Err(AppError::validation(format!(
                    "题目 {:?} 不属于测验 #{}",
                    foreign, quiz_id
                )));
            }
        }

        let score = self.catalog.score(responses).await?;
        info!(
            "📝 测验 #{} 提交完成: {}/{}",
            quiz_id,
            score,
            responses.len()
        );
        Ok(score)
    }

    /// 所有测验摘要
    pub async fn list_quizzes(&self) -> AppResult<Vec<QuizSummary>> {
        Ok(self
            .quizzes
            .all()
            .await?
            .iter()
            .map(QuizSummary::from)
            .collect())
    }

    async fn load_quiz(&self, quiz_id: QuizId) -> AppResult<Quiz> {
        self.quizzes
            .get(quiz_id)
            .await?
            .ok_or_else(|| AppError::quiz_not_found(quiz_id))
    }
}
