//! 测验服务 HTTP 接口
//!
//! | 方法 | 路径 | 说明 |
//! |---|---|---|
//! | POST | `/quiz/create` | `{category, noOfquestions, title}` → 新测验 |
//! | GET | `/quiz/get/{id}` | 测验题目（不含答案） |
//! | POST | `/quiz/submit/{id}` | 作答列表 → 得分 |
//! | GET | `/quiz/all` | 测验摘要列表 |

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use super::bad_request;
use crate::error::AppResult;
use crate::models::{CreateQuizRequest, QuestionView, Quiz, QuizId, QuizSummary, SubmittedResponse};
use crate::orchestrator::QuizOrchestrator;

/// 构建测验服务路由
pub fn router(orchestrator: Arc<QuizOrchestrator>) -> Router {
    Router::new()
        .route("/quiz/create", post(create_quiz))
        .route("/quiz/get/{id}", get(get_quiz_questions))
        .route("/quiz/submit/{id}", post(submit_quiz))
        .route("/quiz/all", get(list_quizzes))
        .with_state(orchestrator)
}

async fn create_quiz(
    State(orchestrator): State<Arc<QuizOrchestrator>>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Quiz>)> {
    let Json(request) = payload.map_err(bad_request)?;
    let quiz = orchestrator.create_quiz_from(&request).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

async fn get_quiz_questions(
    State(orchestrator): State<Arc<QuizOrchestrator>>,
    id: Result<Path<QuizId>, PathRejection>,
) -> AppResult<Json<Vec<QuestionView>>> {
    let Path(id) = id.map_err(bad_request)?;
    Ok(Json(orchestrator.get_quiz_questions(id).await?))
}

async fn submit_quiz(
    State(orchestrator): State<Arc<QuizOrchestrator>>,
    id: Result<Path<QuizId>, PathRejection>,
    payload: Result<Json<Vec<SubmittedResponse>>, JsonRejection>,
) -> AppResult<Json<u32>> {
    let Path(id) = id.map_err(bad_request)?;
    let Json(responses) = payload.map_err(bad_request)?;
    Ok(Json(orchestrator.submit_quiz(id, &responses).await?))
}

async fn list_quizzes(
    State(orchestrator): State<Arc<QuizOrchestrator>>,
) -> AppResult<Json<Vec<QuizSummary>>> {
    Ok(Json(orchestrator.list_quizzes().await?))
}
