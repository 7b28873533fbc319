pub mod classifier;
pub mod config;
pub mod content_bank;
pub mod db;
pub mod error;
pub mod flashcards;
pub mod importer;
pub mod logging;
pub mod quiz_results;
pub mod quizzes;
pub mod service;
pub mod sync;
pub mod walker;

pub use config::{DatabaseConfig, DedupKey, LayoutStrategy, SchemaWait, SyncConfig};
pub use error::{ContentError, Result};
pub use service::ContentService;
pub use sync::{SyncOrchestrator, SyncReport, SyncScope};
