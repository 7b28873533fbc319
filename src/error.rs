/// Errors raised by the content pipeline and the service layer.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content root not found: {path:?}")]
    RootNotFound { path: PathBuf },

    #[error("malformed content in {path:?}: {reason}")]
    MalformedContent { path: PathBuf, reason: String },

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("schema not ready after {attempts} attempts (missing tables: {})", .missing.join(", "))]
    SchemaNotReady { missing: Vec<String>, attempts: u32 },

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },
}

impl ContentError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ContentError::MalformedContent {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error means the pool itself is unusable, so the rest of a
    /// sync pass would fail the same way.
    pub fn is_fatal_for_pass(&self) -> bool {
        matches!(
            self,
            ContentError::Persistence(sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut)
        )
    }

    /// Whether SQLite reported the database as busy (any `SQLITE_BUSY_*`
    /// extended code). The statement can succeed when retried.
    pub fn is_busy(&self) -> bool {
        match self {
            ContentError::Persistence(sqlx::Error::Database(db)) => db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| code & 0xff == SQLITE_BUSY),
            _ => false,
        }
    }
}

const SQLITE_BUSY: i32 = 5;

pub type Result<T> = std::result::Result<T, ContentError>;

use std::path::PathBuf;
use thiserror::Error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_abort_the_pass() {
        assert!(ContentError::Persistence(sqlx::Error::PoolClosed).is_fatal_for_pass());
        assert!(ContentError::Persistence(sqlx::Error::PoolTimedOut).is_fatal_for_pass());
        assert!(!ContentError::Persistence(sqlx::Error::RowNotFound).is_fatal_for_pass());
        assert!(!ContentError::malformed("a.json", "bad").is_fatal_for_pass());
    }

    #[test]
    fn schema_not_ready_lists_missing_tables() {
        let err = ContentError::SchemaNotReady {
            missing: vec!["quizzes".to_string(), "flashcards".to_string()],
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "schema not ready after 3 attempts (missing tables: quizzes, flashcards)"
        );
    }
}
