use quizbank::{db, DatabaseConfig, SyncConfig, SyncOrchestrator};
use sqlx::SqlitePool;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A content root and a migrated database inside one temp folder.
pub struct Fixture {
    pub dir: TempDir,
    pub pool: SqlitePool,
}

impl Fixture {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Courses")).unwrap();
        let pool = db::connect(&DatabaseConfig::new(format!(
            "sqlite://{}",
            dir.path().join("quizbank.db").display()
        )))
        .await
        .unwrap();
        db::run_migrations(&pool).await.unwrap();

        Fixture { dir, pool }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("Courses")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("quizbank.db")
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn orchestrator(&self) -> SyncOrchestrator {
        SyncOrchestrator::new(self.pool.clone(), SyncConfig::new(self.root()))
    }

    /// Counts rows through a separate rusqlite connection, so the check does
    /// not depend on the pool under test.
    pub fn count(&self, sql: &str) -> i64 {
        let conn = rusqlite::Connection::open(self.db_path()).unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }
}

pub fn quiz_json(title: &str, questions: usize) -> String {
    let questions: Vec<_> = (0..questions)
        .map(|i| {
            serde_json::json!({
                "question_text": format!("Question {}?", i + 1),
                "option_a": "a",
                "option_b": "b",
                "option_c": "c",
                "option_d": "d",
                "correct_answer": "A",
            })
        })
        .collect();

    serde_json::json!({
        "quiz": { "title": title, "description": format!("{} description", title) },
        "questions": questions,
    })
    .to_string()
}

pub fn flashcard_json(title: &str, category: Option<&str>, cards: usize) -> String {
    let cards: Vec<_> = (0..cards)
        .map(|i| serde_json::json!({ "front": format!("front {}", i), "back": format!("back {}", i) }))
        .collect();

    serde_json::json!({
        "set": { "title": title, "description": "cards", "category": category },
        "cards": cards,
    })
    .to_string()
}
