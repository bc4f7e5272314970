use crate::models::question::NewQuestion;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 题库种子文件结构
///
/// ```toml
/// [[questions]]
/// question_title = "法国的首都是？"
/// option1 = "Paris"
/// option2 = "Lyon"
/// option3 = "Nice"
/// option4 = "Lille"
/// right_answer = "Paris"
/// category = "geography"
/// difficultylevel = "easy"
/// ```
#[derive(Debug, Deserialize)]
struct QuestionSeed {
    #[serde(default)]
    questions: Vec<NewQuestion>,
}

/// 解析 TOML 文本为待导入的题目列表
pub fn parse_question_seed(content: &str) -> Result<Vec<NewQuestion>> {
    let seed: QuestionSeed = toml::from_str(content).context("无法解析题库种子 TOML")?;
    Ok(seed.questions)
}

/// 从 TOML 文件加载待导入的题目
pub async fn load_question_seed(toml_file_path: &Path) -> Result<Vec<NewQuestion>> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let questions = parse_question_seed(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "从 {} 加载 {} 个题目",
        toml_file_path.display(),
        questions.len()
    );

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_seed() {
        let content = r#"
            [[questions]]
            question_title = "2 + 2 = ?"
            option1 = "3"
            option2 = "4"
            option3 = "5"
            option4 = "22"
            right_answer = "4"
            category = "math"
            difficultylevel = "easy"

            [[questions]]
            question_title = "法国的首都是？"
            option1 = "Paris"
            option2 = "Lyon"
            option3 = "Nice"
            option4 = "Lille"
            right_answer = "Paris"
            category = "geography"
        "#;

        let questions = parse_question_seed(content).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].right_answer, "4");
        assert_eq!(questions[1].category, "geography");
        assert_eq!(questions[1].difficulty, "");
    }

    #[test]
    fn test_empty_seed_is_allowed() {
        assert!(parse_question_seed("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_seed_is_an_error() {
        assert!(parse_question_seed("[[questions]]\nquestion_title = 1").is_err());
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_an_error() {
        let result = load_question_seed(Path::new("does/not/exist.toml")).await;
        assert!(result.is_err());
    }
}
