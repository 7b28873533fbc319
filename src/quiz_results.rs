#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizResult {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: NaiveDateTime,
}

/// A past attempt joined with the quiz title, for the history view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentResult {
    pub id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub score: i64,
    pub taken_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percentage: i64,
}

impl Score {
    /// Grades `answers` against the key, position by position. Missing answers
    /// count as wrong; extra answers are ignored.
    pub fn grade(questions: &[Question], answers: &[AnswerOption]) -> Self {
        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.correct_answer == **a)
            .count();
        let total = questions.len();

        Score {
            correct,
            total,
            percentage: percentage(correct, total),
        }
    }
}

/// Whole-number percentage, rounding halves up.
fn percentage(correct: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as i64
}

pub fn validate_score(score: i64) -> Result<()> {
    if !(0..=100).contains(&score) {
        return Err(ContentError::InvalidInput {
            field: "score".to_string(),
            message: format!("must be between 0 and 100, got {}", score),
        });
    }
    Ok(())
}

pub async fn insert_result(pool: &SqlitePool, quiz_id: i64, score: i64) -> Result<QuizResult> {
    validate_score(score)?;

    let result = sqlx::query_as::<_, QuizResult>(
        r#"
        INSERT INTO quiz_results (quiz_id, score)
        VALUES (?, ?)
        RETURNING id, quiz_id, score, taken_at
        "#,
    )
    .bind(quiz_id)
    .bind(score)
    .fetch_one(pool)
    .await?;

    Ok(result)
}

pub async fn fetch_recent_results(pool: &SqlitePool, limit: i64) -> Result<Vec<RecentResult>> {
    let results = sqlx::query_as::<_, RecentResult>(
        r#"
        SELECT r.id, r.quiz_id, q.title, r.score, r.taken_at
        FROM quiz_results r
        JOIN quizzes q ON q.id = r.quiz_id
        ORDER BY r.taken_at DESC, r.id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(results)
}

use crate::error::{ContentError, Result};
use crate::quizzes::{AnswerOption, Question};
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, answer: AnswerOption) -> Question {
        Question {
            id,
            quiz_id: 1,
            question_text: format!("q{}", id),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            correct_answer: answer,
            hint: None,
        }
    }

    #[test]
    fn grades_by_position() {
        let questions = vec![
            question(1, AnswerOption::A),
            question(2, AnswerOption::B),
            question(3, AnswerOption::C),
        ];
        let score = Score::grade(&questions, &[AnswerOption::A, AnswerOption::D, AnswerOption::C]);
        assert_eq!(score.correct, 2);
        assert_eq!(score.total, 3);
        assert_eq!(score.percentage, 67);
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let questions = vec![question(1, AnswerOption::A), question(2, AnswerOption::B)];
        let score = Score::grade(&questions, &[AnswerOption::A]);
        assert_eq!(score.percentage, 50);
        assert_eq!(Score::grade(&[], &[]).percentage, 0);
    }

    #[test]
    fn score_range_is_enforced() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(100).is_ok());
        assert!(matches!(
            validate_score(101),
            Err(ContentError::InvalidInput { .. })
        ));
        assert!(validate_score(-1).is_err());
    }
}
