/// Tables the service cannot run without.
pub const REQUIRED_TABLES: &[&str] = &[
    "quizzes",
    "questions",
    "flashcard_sets",
    "flashcards",
    "quiz_results",
];

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CourseStats {
    pub category: String,
    pub quizzes: i64,
    pub questions: i64,
    pub flashcard_sets: i64,
    pub flashcards: i64,
}

/// Opens the connection pool. The database file is created if missing.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!(
        database_url = %config.url,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            ContentError::Persistence(e)
        })?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Migration failed");
            ContentError::Migration(e.to_string())
        })?;

    Ok(())
}

/// Names of the required tables that do not exist yet.
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let present: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    Ok(REQUIRED_TABLES
        .iter()
        .filter(|table| !present.iter().any(|name| name == *table))
        .map(|table| table.to_string())
        .collect())
}

/// Polls until every required table exists, giving up after
/// `wait.attempts` checks.
pub async fn wait_for_schema(pool: &SqlitePool, wait: SchemaWait) -> Result<()> {
    let mut missing = Vec::new();

    for attempt in 1..=wait.attempts {
        missing = missing_tables(pool).await?;
        if missing.is_empty() {
            info!(attempt, "Schema ready");
            return Ok(());
        }

        warn!(attempt, missing = ?missing, "Schema not ready, retrying");
        if attempt < wait.attempts {
            tokio::time::sleep(wait.interval).await;
        }
    }

    Err(ContentError::SchemaNotReady {
        missing,
        attempts: wait.attempts,
    })
}

/// Distinct course names across quizzes and flashcard sets, ascending.
pub async fn fetch_courses(pool: &SqlitePool) -> Result<Vec<String>> {
    let courses = sqlx::query_scalar::<_, String>(
        r#"
        SELECT category FROM quizzes WHERE category IS NOT NULL
        UNION
        SELECT category FROM flashcard_sets WHERE category IS NOT NULL
        ORDER BY category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    debug!(count = courses.len(), "Fetched course list");
    Ok(courses)
}

pub async fn fetch_course_stats(pool: &SqlitePool) -> Result<Vec<CourseStats>> {
    let stats = sqlx::query_as::<_, CourseStats>(
        r#"
        WITH courses AS (
            SELECT category FROM quizzes WHERE category IS NOT NULL
            UNION
            SELECT category FROM flashcard_sets WHERE category IS NOT NULL
        )
        SELECT
            c.category,
            (SELECT COUNT(*) FROM quizzes q WHERE q.category = c.category) AS quizzes,
            (SELECT COUNT(*) FROM questions qs JOIN quizzes q ON q.id = qs.quiz_id
                WHERE q.category = c.category) AS questions,
            (SELECT COUNT(*) FROM flashcard_sets s WHERE s.category = c.category) AS flashcard_sets,
            (SELECT COUNT(*) FROM flashcards f JOIN flashcard_sets s ON s.id = f.set_id
                WHERE s.category = c.category) AS flashcards
        FROM courses c
        ORDER BY c.category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(stats)
}

use crate::config::{DatabaseConfig, SchemaWait};
use crate::error::{ContentError, Result};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, warn};
