//! 题库服务 - 业务能力层
//!
//! 题目内容与正确答案的唯一持有者。对外只暴露：
//! - 按分类随机抽取题目 id（抽题）
//! - 把 id 解析为不含答案的题目内容（渲染）
//! - 用题库中的标准答案给作答计分（计分）

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::QuestionStore;
use crate::models::{NewQuestion, Question, QuestionId, QuestionView, SubmittedResponse};
use crate::utils::logging::truncate_text;

/// 题库服务
///
/// 职责：
/// - 持有题目存储
/// - 决定抽题策略和答案比对规则
/// - 不认识 Quiz
pub struct QuestionCatalog {
    store: Arc<dyn QuestionStore>,
}

impl QuestionCatalog {
    /// 创建新的题库服务
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// 全部题目（含答案，仅供管理端使用）
    pub async fn list_all(&self) -> AppResult<Vec<Question>> {
        self.store.all().await
    }

    /// 分类完全匹配（区分大小写）的题目，无匹配时返回空列表
    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<Question>> {
        let questions = self.store.find_by_category(category).await?;
        debug!("分类 '{}' 下共有 {} 个题目", category, questions.len());
        Ok(questions)
    }

    /// 所有出现过的分类，按字典序排列
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        let categories: BTreeSet<String> = self
            .store
            .all()
            .await?
            .into_iter()
            .map(|q| q.category)
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// 从分类中随机抽取最多 `count` 个不重复的题目 id
    ///
    /// 匹配的题目不足 `count` 个时返回全部匹配的 id，不报错。返回顺序不做保证。
    pub async fn sample_ids(&self, category: &str, count: usize) -> AppResult<Vec<QuestionId>> {
        let candidates = self.store.ids_by_category(category).await?;
        let available = candidates.len();
        let sampled = sample_without_replacement(candidates, count, &mut rand::thread_rng());

        if sampled.len() < count {
            info!(
                "📋 分类 '{}' 只有 {} 个题目，少于请求的 {} 个，返回全部",
                category, available, count
            );
        } else {
            info!("📋 从分类 '{}' 抽取了 {} 个题目", category, sampled.len());
        }

        Ok(sampled)
    }

    /// 把题目 id 解析为不含答案的题目内容，顺序与请求一致
    ///
    /// 只要有一个 id 不存在，整批返回 `NotFound`，错误中列出所有缺失的 id。
    pub async fn resolve(&self, ids: &[QuestionId]) -> AppResult<Vec<QuestionView>> {
        let questions = self.fetch_all(ids).await?;
        let views: Vec<QuestionView> = ids
            .iter()
            .filter_map(|id| questions.get(id))
            .map(QuestionView::from)
            .collect();

        debug!("解析了 {} 个题目", views.len());
        Ok(views)
    }

    /// 用标准答案为作答计分（忽略大小写）
    ///
    /// 结果与作答顺序无关。只要有一个 id 不存在，整批返回 `NotFound`。
    pub async fn score(&self, responses: &[SubmittedResponse]) -> AppResult<u32> {
        let ids: Vec<QuestionId> = responses.iter().map(|r| r.id).collect();
        let questions = self.fetch_all(&ids).await?;

        let correct = responses
            .iter()
            .filter(|r| {
                questions
                    .get(&r.id)
                    .is_some_and(|question| question.is_correct(&r.response))
            })
            .count() as u32;

        info!("📝 计分完成: {}/{}", correct, responses.len());
        Ok(correct)
    }

    /// 新增题目，返回分配的 id
    pub async fn add(&self, question: NewQuestion) -> AppResult<QuestionId> {
        if let Some(field) = question.first_blank_field() {
            return Err(AppError::validation(format!("字段 {} 不能为空", field)));
        }

        let saved = self.store.insert(question).await?;
        info!(
            "✓ 新增题目 #{} [{}]: {}",
            saved.id,
            saved.category,
            truncate_text(&saved.title, 40)
        );
        Ok(saved.id)
    }

    /// 批量导入题目，返回导入数量
    pub async fn import(&self, questions: Vec<NewQuestion>) -> AppResult<usize> {
        let total = questions.len();
        for question in questions {
            self.add(question).await?;
        }
        info!("✓ 导入 {} 个题目", total);
        Ok(total)
    }

    /// 按 id 查询所有题目，缺失的 id 汇总成一个 `NotFound`
    async fn fetch_all(&self, ids: &[QuestionId]) -> AppResult<HashMap<QuestionId, Question>> {
        let mut found = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();

        for &id in ids {
            if found.contains_key(&id) || missing.contains(&id) {
                continue;
            }
            match self.store.get(id).await? {
                Some(question) => {
                    found.insert(id, question);
                }
                None => missing.push(id),
            }
        }

        if !missing.is_empty() {
            warn!("⚠️ 题目不存在: {:?}", missing);
            return Err(AppError::question_not_found(missing));
        }

        Ok(found)
    }
}

/// 无放回均匀抽样，数量不超过候选集大小
pub fn sample_without_replacement<R: Rng + ?Sized>(
    mut candidates: Vec<QuestionId>,
    count: usize,
    rng: &mut R,
) -> Vec<QuestionId> {
    let (picked, _) = candidates.partial_shuffle(rng, count);
    picked.to_vec()
}

/// 校验请求的题目数量
pub fn validate_count(count: i64) -> AppResult<usize> {
    usize::try_from(count)
        .map_err(|_| AppError::validation(format!("题目数量不能为负数: {}", count)))
}
