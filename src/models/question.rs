use serde::{Deserialize, Serialize};

/// 题目 id，由题库服务分配
pub type QuestionId = u32;

/// 题库中的完整题目（包含正确答案，只在题库服务内部流转）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question_title")]
    pub title: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub right_answer: String,
    pub category: String,
    #[serde(rename = "difficultylevel", default)]
    pub difficulty: String,
}

/// 新增题目请求（尚未分配 id）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    #[serde(rename = "question_title")]
    pub title: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub right_answer: String,
    pub category: String,
    #[serde(rename = "difficultylevel", default)]
    pub difficulty: String,
}

impl NewQuestion {
    /// 分配 id 后生成完整题目
    pub fn with_id(self, id: QuestionId) -> Question {
        Question {
            id,
            title: self.title,
            option1: self.option1,
            option2: self.option2,
            option3: self.option3,
            option4: self.option4,
            right_answer: self.right_answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }

    /// 返回第一个为空的必填字段名
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("question_title", &self.title),
            ("option1", &self.option1),
            ("option2", &self.option2),
            ("option3", &self.option3),
            ("option4", &self.option4),
            ("right_answer", &self.right_answer),
            ("category", &self.category),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// 用于渲染的题目内容，不含正确答案
///
/// 这个类型没有答案字段，任何由它序列化出的响应都不可能泄露答案。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    #[serde(rename = "question_title")]
    pub title: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            title: question.title.clone(),
            option1: question.option1.clone(),
            option2: question.option2.clone(),
            option3: question.option3.clone(),
            option4: question.option4.clone(),
        }
    }
}

/// 客户端提交的一条作答（题目 id + 答案），只在计分期间存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResponse {
    pub id: QuestionId,
    pub response: String,
}

impl SubmittedResponse {
    pub fn new(id: QuestionId, response: impl Into<String>) -> Self {
        Self {
            id,
            response: response.into(),
        }
    }
}

impl Question {
    /// 忽略大小写比较作答是否正确
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.to_lowercase() == self.right_answer.to_lowercase()
    }
}
