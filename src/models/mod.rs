pub mod loaders;
pub mod question;
pub mod quiz;

pub use loaders::{load_question_seed, parse_question_seed};
pub use question::{NewQuestion, Question, QuestionId, QuestionView, SubmittedResponse};
pub use quiz::{CreateQuizRequest, NewQuiz, Quiz, QuizId, QuizSummary};
