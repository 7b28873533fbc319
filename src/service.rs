//! Endpoint contracts of the learning app, one method per route.
//!
//! The pool and the sync orchestrator are injected at construction; handlers
//! never reach for ambient state.

/// Number of attempts the history view shows by default.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct SyncMessage {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseOverview {
    pub category: String,
    pub quizzes: Vec<Quiz>,
    pub flashcard_sets: Vec<FlashcardSet>,
}

/// Body of `POST /quizzes`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuiz {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradedAttempt {
    pub score: Score,
    pub result: QuizResult,
}

#[derive(Debug, Clone)]
pub struct ContentService {
    pool: SqlitePool,
    sync: SyncOrchestrator,
}

impl ContentService {
    pub fn new(pool: SqlitePool, sync: SyncOrchestrator) -> Self {
        Self { pool, sync }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// `GET /courses`
    pub async fn list_courses(&self) -> Result<Vec<String>> {
        db::fetch_courses(&self.pool).await
    }

    /// `GET /courses/:category`
    pub async fn course_overview(&self, category: &str) -> Result<CourseOverview> {
        Ok(CourseOverview {
            category: category.to_string(),
            quizzes: quizzes::fetch_quizzes_in_category(&self.pool, category).await?,
            flashcard_sets: flashcards::fetch_sets_in_category(&self.pool, category).await?,
        })
    }

    /// `GET /courses/stats`
    pub async fn course_stats(&self) -> Result<Vec<CourseStats>> {
        db::fetch_course_stats(&self.pool).await
    }

    /// `GET /quizzes`
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        quizzes::fetch_all_quizzes(&self.pool).await
    }

    /// `GET /quizzes/:id`
    pub async fn get_quiz(&self, quiz_id: i64) -> Result<QuizWithQuestions> {
        quizzes::fetch_quiz_with_questions(&self.pool, quiz_id)
            .await?
            .ok_or(ContentError::NotFound {
                entity: "quiz",
                id: quiz_id,
            })
    }

    /// `POST /quizzes`. The quiz and its questions are written in one
    /// transaction; a quiz with the same title and category is rejected.
    pub async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<i64> {
        if new_quiz.title.trim().is_empty() {
            return Err(ContentError::InvalidInput {
                field: "title".to_string(),
                message: "must not be blank".to_string(),
            });
        }

        let category = new_quiz.category.clone();
        let content = ParsedContent::Quiz(QuizFile {
            quiz: QuizHeader {
                title: new_quiz.title,
                description: new_quiz.description,
            },
            questions: new_quiz.questions,
        });

        let importer = Importer::new(self.pool.clone(), self.sync.config().dedup);
        match importer.import(&content, category.as_deref()).await? {
            ImportOutcome::Imported { id, .. } => Ok(id),
            ImportOutcome::AlreadyExists { .. } => Err(ContentError::InvalidInput {
                field: "title".to_string(),
                message: format!("a quiz titled '{}' already exists", content.title()),
            }),
        }
    }

    /// `POST /quizzes/results`
    pub async fn record_result(&self, quiz_id: i64, score: i64) -> Result<QuizResult> {
        quiz_results::validate_score(score)?;
        if quizzes::fetch_quiz(&self.pool, quiz_id).await?.is_none() {
            return Err(ContentError::NotFound {
                entity: "quiz",
                id: quiz_id,
            });
        }

        let result = quiz_results::insert_result(&self.pool, quiz_id, score).await?;
        info!(quiz_id, score, "Recorded quiz result");
        Ok(result)
    }

    /// `POST /quizzes/:id/grade`
    pub async fn grade_quiz(&self, quiz_id: i64, answers: &[AnswerOption]) -> Result<GradedAttempt> {
        let quiz = self.get_quiz(quiz_id).await?;
        let score = Score::grade(&quiz.questions, answers);
        let result = quiz_results::insert_result(&self.pool, quiz_id, score.percentage).await?;

        Ok(GradedAttempt { score, result })
    }

    /// `GET /quizzes/results/recent`
    pub async fn recent_results(&self, limit: i64) -> Result<Vec<RecentResult>> {
        quiz_results::fetch_recent_results(&self.pool, limit.max(0)).await
    }

    /// `GET /flashcards`
    pub async fn list_flashcard_sets(&self) -> Result<Vec<FlashcardSet>> {
        flashcards::fetch_all_sets(&self.pool).await
    }

    /// `GET /flashcards/:id`
    pub async fn get_flashcard_set(&self, set_id: i64) -> Result<FlashcardSetWithCards> {
        flashcards::fetch_set_with_cards(&self.pool, set_id)
            .await?
            .ok_or(ContentError::NotFound {
                entity: "flashcard set",
                id: set_id,
            })
    }

    /// Runs a pass and returns the full report.
    pub async fn sync_report(&self, scope: SyncScope) -> Result<SyncReport> {
        self.sync.run_sync(scope).await
    }

    /// `POST /quizzes/sync`, `POST /flashcards/sync`, `POST /courses/sync`
    pub async fn sync(&self, scope: SyncScope) -> Result<SyncMessage> {
        info!(scope = ?scope, "Manual sync requested");
        match self.sync.run_sync(scope).await {
            Ok(report) => Ok(SyncMessage {
                success: true,
                message: completion_message(scope, &report),
            }),
            Err(e) => {
                warn!(error = %e, "Manual sync failed");
                Err(e)
            }
        }
    }
}

fn completion_message(scope: SyncScope, report: &SyncReport) -> String {
    let what = match scope {
        SyncScope::All => "Content",
        SyncScope::Quizzes => "Quiz",
        SyncScope::FlashcardSets => "Flashcard",
    };
    let mut message = format!("{} sync completed: {} new item(s) imported", what, report.imported);
    if report.failed > 0 {
        message.push_str(&format!(", {} file(s) failed. Check server logs for details", report.failed));
    }
    message.push('.');
    message
}

use crate::content_bank::{ParsedContent, QuestionEntry, QuizFile, QuizHeader};
use crate::db::{self, CourseStats};
use crate::error::{ContentError, Result};
use crate::flashcards::{self, FlashcardSet, FlashcardSetWithCards};
use crate::importer::{ImportOutcome, Importer};
use crate::quiz_results::{self, QuizResult, RecentResult, Score};
use crate::quizzes::{self, AnswerOption, Quiz, QuizWithQuestions};
use crate::sync::{SyncOrchestrator, SyncReport, SyncScope};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
