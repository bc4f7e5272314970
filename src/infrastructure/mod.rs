//! 基础设施层（Infrastructure）
//!
//! 持有数据资源，只暴露存取能力，不包含业务规则

pub mod question_store;
pub mod quiz_store;

pub use question_store::{InMemoryQuestionStore, QuestionStore};
pub use quiz_store::{InMemoryQuizStore, QuizStore};
