/// Rows per multi-row INSERT; keeps bind parameters well under SQLite's limit.
pub(crate) const BULK_CHUNK: usize = 100;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "TEXT")]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl std::str::FromStr for AnswerOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            other => Err(format!("expected one of A, B, C, D but got '{}'", other)),
        }
    }
}

pub async fn fetch_all_quizzes(pool: &SqlitePool) -> Result<Vec<Quiz>> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        "SELECT id, title, description, category, created_at FROM quizzes ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}

pub async fn fetch_quizzes_in_category(pool: &SqlitePool, category: &str) -> Result<Vec<Quiz>> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, title, description, category, created_at
        FROM quizzes
        WHERE category = ?
        ORDER BY title ASC
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}

pub async fn fetch_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<Option<Quiz>> {
    let quiz = sqlx::query_as::<_, Quiz>(
        "SELECT id, title, description, category, created_at FROM quizzes WHERE id = ?",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?;

    Ok(quiz)
}

/// Questions of a quiz in insertion order.
pub async fn fetch_questions(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, question_text, option_a, option_b, option_c, option_d, correct_answer, hint
        FROM questions
        WHERE quiz_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

pub async fn fetch_quiz_with_questions(
    pool: &SqlitePool,
    quiz_id: i64,
) -> Result<Option<QuizWithQuestions>> {
    let Some(quiz) = fetch_quiz(pool, quiz_id).await? else {
        return Ok(None);
    };
    let questions = fetch_questions(pool, quiz_id).await?;

    Ok(Some(QuizWithQuestions { quiz, questions }))
}

/// Looks up a quiz by natural key on an open connection or transaction.
pub(crate) async fn find_quiz_id(
    conn: &mut SqliteConnection,
    title: &str,
    category: Option<&str>,
    dedup: DedupKey,
) -> Result<Option<i64>> {
    let id = match dedup {
        DedupKey::Title => {
            sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE title = ? ORDER BY id LIMIT 1")
                .bind(title)
                .fetch_optional(&mut *conn)
                .await?
        }
        DedupKey::TitleAndCategory => {
            sqlx::query_scalar::<_, i64>(
                "SELECT id FROM quizzes WHERE title = ? AND category IS ? ORDER BY id LIMIT 1",
            )
            .bind(title)
            .bind(category)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    Ok(id)
}

/// Another quiz with the same title, in any course.
pub(crate) async fn find_other_quiz_id(
    conn: &mut SqliteConnection,
    title: &str,
    id: i64,
) -> Result<Option<i64>> {
    let other = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM quizzes WHERE title = ? AND id <> ? ORDER BY id LIMIT 1",
    )
    .bind(title)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(other)
}

/// Inserts the quiz row. `None` means a row with the same natural key won the
/// race and nothing was written.
pub(crate) async fn insert_quiz(
    conn: &mut SqliteConnection,
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quizzes (title, description, category)
        VALUES (?, ?, ?)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(category)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

/// Bulk inserts questions for `quiz_id` with multi-row `VALUES`.
pub(crate) async fn insert_questions(
    conn: &mut SqliteConnection,
    quiz_id: i64,
    questions: &[QuestionEntry],
) -> Result<u64> {
    let mut inserted = 0;
    for chunk in questions.chunks(BULK_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO questions (quiz_id, question_text, option_a, option_b, option_c, option_d, correct_answer, hint) ",
        );
        builder.push_values(chunk, |mut row, q| {
            row.push_bind(quiz_id)
                .push_bind(q.question_text.as_str())
                .push_bind(q.option_a.as_str())
                .push_bind(q.option_b.as_str())
                .push_bind(q.option_c.as_str())
                .push_bind(q.option_d.as_str())
                .push_bind(q.correct_answer)
                .push_bind(q.hint.as_deref());
        });
        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

use crate::config::DedupKey;
use crate::content_bank::QuestionEntry;
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_labels_parse_case_insensitively() {
        assert_eq!("b".parse::<AnswerOption>().unwrap(), AnswerOption::B);
        assert_eq!(" D ".parse::<AnswerOption>().unwrap(), AnswerOption::D);
        assert!("E".parse::<AnswerOption>().is_err());
    }

    #[test]
    fn quiz_with_questions_serializes_flat() {
        let quiz = Quiz {
            id: 7,
            title: "Midterm".to_string(),
            description: None,
            category: Some("STAT-245".to_string()),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        };
        let value = serde_json::to_value(QuizWithQuestions {
            quiz,
            questions: Vec::new(),
        })
        .unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["category"], "STAT-245");
        assert!(value["questions"].as_array().unwrap().is_empty());
    }
}
