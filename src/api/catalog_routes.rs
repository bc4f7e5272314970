//! 题库服务 HTTP 接口
//!
//! | 方法 | 路径 | 说明 |
//! |---|---|---|
//! | GET | `/Question/allQuestions` | 全部题目（含答案，管理端使用） |
//! | GET | `/Question/category/{category}` | 分类下的题目 |
//! | GET | `/Question/categories` | 所有分类 |
//! | POST | `/Question/addQuestion` | 新增题目，返回 id |
//! | GET | `/Question/generate?categoryname=&numofquestions=` | 随机抽取题目 id |
//! | POST | `/Question/getQuestions` | id 列表 → 不含答案的题目 |
//! | POST | `/Question/getscore` | 作答列表 → 得分 |

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::bad_request;
use crate::error::AppResult;
use crate::models::{NewQuestion, Question, QuestionId, QuestionView, SubmittedResponse};
use crate::services::catalog_service::{validate_count, QuestionCatalog};

/// 抽题查询参数
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub categoryname: String,
    pub numofquestions: i64,
}

/// 构建题库服务路由
pub fn router(catalog: Arc<QuestionCatalog>) -> Router {
    Router::new()
        .route("/Question/allQuestions", get(all_questions))
        .route("/Question/category/{category}", get(questions_by_category))
        .route("/Question/categories", get(categories))
        .route("/Question/addQuestion", post(add_question))
        .route("/Question/generate", get(generate))
        .route("/Question/getQuestions", post(get_questions))
        .route("/Question/getscore", post(get_score))
        .with_state(catalog)
}

async fn all_questions(
    State(catalog): State<Arc<QuestionCatalog>>,
) -> AppResult<Json<Vec<Question>>> {
    Ok(Json(catalog.list_all().await?))
}

async fn questions_by_category(
    State(catalog): State<Arc<QuestionCatalog>>,
    category: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Vec<Question>>> {
    let Path(category) = category.map_err(bad_request)?;
    Ok(Json(catalog.list_by_category(&category).await?))
}

async fn categories(State(catalog): State<Arc<QuestionCatalog>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(catalog.list_categories().await?))
}

async fn add_question(
    State(catalog): State<Arc<QuestionCatalog>>,
    payload: Result<Json<NewQuestion>, JsonRejection>,
) -> AppResult<(StatusCode, Json<QuestionId>)> {
    let Json(question) = payload.map_err(bad_request)?;
    let id = catalog.add(question).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

async fn generate(
    State(catalog): State<Arc<QuestionCatalog>>,
    params: Result<Query<GenerateParams>, QueryRejection>,
) -> AppResult<Json<Vec<QuestionId>>> {
    let Query(params) = params.map_err(bad_request)?;
    let count = validate_count(params.numofquestions)?;
    Ok(Json(catalog.sample_ids(&params.categoryname, count).await?))
}

async fn get_questions(
    State(catalog): State<Arc<QuestionCatalog>>,
    payload: Result<Json<Vec<QuestionId>>, JsonRejection>,
) -> AppResult<Json<Vec<QuestionView>>> {
    let Json(ids) = payload.map_err(bad_request)?;
    Ok(Json(catalog.resolve(&ids).await?))
}

async fn get_score(
    State(catalog): State<Arc<QuestionCatalog>>,
    payload: Result<Json<Vec<SubmittedResponse>>, JsonRejection>,
) -> AppResult<Json<u32>> {
    let Json(responses) = payload.map_err(bad_request)?;
    Ok(Json(catalog.score(&responses).await?))
}
