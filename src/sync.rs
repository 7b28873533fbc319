// src/sync.rs

/// Which kinds of content a pass imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncScope {
    #[default]
    All,
    Quizzes,
    FlashcardSets,
}

impl SyncScope {
    fn includes(self, kind: ContentKind) -> bool {
        match self {
            SyncScope::All => kind != ContentKind::Unrecognized,
            SyncScope::Quizzes => kind == ContentKind::Quiz,
            SyncScope::FlashcardSets => kind == ContentKind::FlashcardSet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub files_seen: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<SyncFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Unrecognized,
    OutOfScope,
    NoCategory,
    Empty,
    AlreadyExists,
}

enum FileOutcome {
    Imported,
    Skipped(SkipReason),
}

/// Runs walk → classify → parse → import passes over the content root.
///
/// Clones share one lock, so passes never interleave within a process.
#[derive(Debug, Clone)]
pub struct SyncOrchestrator {
    config: Arc<SyncConfig>,
    importer: Importer,
    lock: Arc<Mutex<()>>,
}

impl SyncOrchestrator {
    pub fn new(pool: SqlitePool, config: SyncConfig) -> Self {
        let importer = Importer::new(pool, config.dedup);
        Self {
            config: Arc::new(config),
            importer,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs one sync pass.
    ///
    /// Per-file problems are counted in the report; only a failure of the pool
    /// itself ends the pass early with `Err`.
    pub async fn run_sync(&self, scope: SyncScope) -> Result<SyncReport> {
        let _guard = self.lock.lock().await;
        let started = Instant::now();
        let mut report = SyncReport::default();

        let tree = match walk_files(&self.config.content_root, self.config.effective_depth()) {
            Ok(tree) => tree,
            Err(ContentError::RootNotFound { path }) => {
                warn!(root = ?path, "Content root not found, nothing to sync");
                return Ok(report);
            }
            Err(e) => return Err(e),
        };

        info!(
            root = ?tree.root,
            files = tree.files.len(),
            scope = ?scope,
            "Starting content sync"
        );

        for path in &tree.files {
            report.files_seen += 1;
            match self.process_file(&tree.root, path, scope).await {
                Ok(FileOutcome::Imported) => report.imported += 1,
                Ok(FileOutcome::Skipped(reason)) => {
                    debug!(path = ?path, reason = ?reason, "Skipped file");
                    report.skipped += 1;
                }
                Err(e) if e.is_fatal_for_pass() => {
                    warn!(path = ?path, error = %e, "Sync aborted");
                    return Err(e);
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to sync file");
                    report.failed += 1;
                    report.failures.push(SyncFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            files_seen = report.files_seen,
            imported = report.imported,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Content sync finished"
        );
        Ok(report)
    }

    async fn process_file(&self, root: &Path, path: &Path, scope: SyncScope) -> Result<FileOutcome> {
        let kind = classify(path, self.config.layout);
        if kind == ContentKind::Unrecognized {
            return Ok(FileOutcome::Skipped(SkipReason::Unrecognized));
        }
        if !scope.includes(kind) {
            return Ok(FileOutcome::Skipped(SkipReason::OutOfScope));
        }

        let folder_category = match self.config.layout {
            LayoutStrategy::NestedByCourse => match derive_category(root, path) {
                Some(category) => Some(category),
                None => return Ok(FileOutcome::Skipped(SkipReason::NoCategory)),
            },
            LayoutStrategy::Flat { .. } => None,
        };

        let Some(content) = load_content(path, kind)? else {
            return Ok(FileOutcome::Skipped(SkipReason::Empty));
        };

        let category = folder_category
            .as_deref()
            .or_else(|| content.embedded_category());

        match self.importer.import(&content, category).await? {
            ImportOutcome::Imported { .. } => Ok(FileOutcome::Imported),
            ImportOutcome::AlreadyExists { .. } => Ok(FileOutcome::Skipped(SkipReason::AlreadyExists)),
        }
    }
}

use crate::classifier::{classify, derive_category, ContentKind};
use crate::config::{LayoutStrategy, SyncConfig};
use crate::content_bank::load_content;
use crate::error::{ContentError, Result};
use crate::importer::{ImportOutcome, Importer};
use crate::walker::walk_files;
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
