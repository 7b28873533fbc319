#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new parent row and `children` child rows were written.
    Imported { id: i64, children: u64 },
    /// A row with the same natural key already exists; nothing was written.
    AlreadyExists { id: Option<i64> },
}

/// Attempts per record when SQLite reports the database as busy.
const BUSY_ATTEMPTS: u32 = 5;
const BUSY_BACKOFF: Duration = Duration::from_millis(50);

/// Writes parsed content to the database at most once per natural key.
///
/// The parent insert, the existence check and the child inserts run in one
/// transaction: either the whole record becomes visible or none of it does.
/// The parent insert is the first statement, so the transaction takes the
/// write lock up front and waits on the busy timeout instead of failing when
/// another connection is importing at the same time.
#[derive(Debug, Clone)]
pub struct Importer {
    pool: SqlitePool,
    dedup: DedupKey,
}

impl Importer {
    pub fn new(pool: SqlitePool, dedup: DedupKey) -> Self {
        Self { pool, dedup }
    }

    pub async fn import(&self, content: &ParsedContent, category: Option<&str>) -> Result<ImportOutcome> {
        let mut attempt = 1;
        loop {
            match self.import_once(content, category).await {
                Err(e) if e.is_busy() && attempt < BUSY_ATTEMPTS => {
                    debug!(error = %e, title = content.title(), attempt, "Database busy, retrying import");
                    sleep(BUSY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn import_once(&self, content: &ParsedContent, category: Option<&str>) -> Result<ImportOutcome> {
        let mut tx = self.pool.begin().await?;

        let outcome = match content {
            ParsedContent::Quiz(file) => import_quiz(&mut *tx, file, category, self.dedup).await,
            ParsedContent::FlashcardSet(file) => {
                import_flashcard_set(&mut *tx, file, category, self.dedup).await
            }
        };

        match outcome {
            Ok(outcome @ ImportOutcome::Imported { id, children }) => {
                tx.commit().await?;
                info!(
                    title = content.title(),
                    category = category.unwrap_or("-"),
                    id,
                    children,
                    "Imported new content"
                );
                Ok(outcome)
            }
            Ok(outcome) => {
                // A title-only duplicate may have written its parent row already.
                tx.rollback().await?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, title = content.title(), "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

async fn import_quiz(
    conn: &mut SqliteConnection,
    file: &QuizFile,
    category: Option<&str>,
    dedup: DedupKey,
) -> Result<ImportOutcome> {
    let title = file.quiz.title.as_str();

    let Some(id) = quizzes::insert_quiz(conn, title, file.quiz.description.as_deref(), category).await? else {
        let id = quizzes::find_quiz_id(conn, title, category, DedupKey::TitleAndCategory).await?;
        debug!(title, ?id, "Quiz already exists, skipping");
        return Ok(ImportOutcome::AlreadyExists { id });
    };

    if dedup == DedupKey::Title {
        if let Some(existing) = quizzes::find_other_quiz_id(conn, title, id).await? {
            debug!(title, id = existing, "Quiz title already exists in another course, skipping");
            return Ok(ImportOutcome::AlreadyExists { id: Some(existing) });
        }
    }

    let children = quizzes::insert_questions(conn, id, &file.questions).await?;
    Ok(ImportOutcome::Imported { id, children })
}

async fn import_flashcard_set(
    conn: &mut SqliteConnection,
    file: &FlashcardFile,
    category: Option<&str>,
    dedup: DedupKey,
) -> Result<ImportOutcome> {
    let title = file.set.title.as_str();

    let Some(id) = flashcards::insert_set(conn, title, file.set.description.as_deref(), category).await? else {
        let id = flashcards::find_set_id(conn, title, category, DedupKey::TitleAndCategory).await?;
        debug!(title, ?id, "Flashcard set already exists, skipping");
        return Ok(ImportOutcome::AlreadyExists { id });
    };

    if dedup == DedupKey::Title {
        if let Some(existing) = flashcards::find_other_set_id(conn, title, id).await? {
            debug!(title, id = existing, "Flashcard set title already exists in another course, skipping");
            return Ok(ImportOutcome::AlreadyExists { id: Some(existing) });
        }
    }

    let children = flashcards::insert_cards(conn, id, &file.cards).await?;
    Ok(ImportOutcome::Imported { id, children })
}

use crate::config::DedupKey;
use crate::content_bank::{FlashcardFile, ParsedContent, QuizFile};
use crate::error::Result;
use crate::{flashcards, quizzes};
use sqlx::{SqliteConnection, SqlitePool};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
