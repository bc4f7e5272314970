use serde::{Deserialize, Serialize};

use super::question::QuestionId;

/// 测验 id，由测验服务分配
pub type QuizId = u32;

/// 测验：标题 + 创建时确定的题目 id 序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[serde(rename = "questionIds")]
    pub question_ids: Vec<QuestionId>,
}

impl Quiz {
    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.question_ids.contains(&question_id)
    }
}

/// 待保存的测验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuiz {
    pub title: String,
    pub question_ids: Vec<QuestionId>,
}

/// 创建测验请求
///
/// `noOfquestions` 保留为有符号整数，负数需要作为参数错误返回，而不是反序列化失败
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    pub category: String,
    #[serde(rename = "noOfquestions")]
    pub count: i64,
    pub title: String,
}

/// 测验摘要（列表展示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            question_count: quiz.question_ids.len(),
        }
    }
}
