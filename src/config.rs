/// How content files are laid out under the content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// `Root/<Category>/.../*-quiz.json` and `*-flashcard.json`. The category
    /// comes from the first directory under the root.
    #[default]
    NestedByCourse,
    /// A single folder of `*.json` files of one kind. The category, if any,
    /// comes from the file itself.
    Flat { kind: ContentKind },
}

/// Which fields identify an already-imported quiz or flashcard set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    Title,
    #[default]
    TitleAndCategory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite:quizbank.db`
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Bounded wait for the schema at startup.
#[derive(Debug, Clone, Copy)]
pub struct SchemaWait {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for SchemaWait {
    fn default() -> Self {
        Self {
            attempts: 15,
            interval: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub content_root: PathBuf,
    pub layout: LayoutStrategy,
    pub dedup: DedupKey,
    /// Depth cap for the walker; also stops runaway descent through links.
    pub max_depth: usize,
}

impl SyncConfig {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            layout: LayoutStrategy::default(),
            dedup: DedupKey::default(),
            max_depth: 16,
        }
    }

    pub fn with_layout(mut self, layout: LayoutStrategy) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupKey) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Flat folders are never descended into.
    pub fn effective_depth(&self) -> usize {
        match self.layout {
            LayoutStrategy::Flat { .. } => 1,
            LayoutStrategy::NestedByCourse => self.max_depth,
        }
    }
}

use crate::classifier::ContentKind;
use std::path::PathBuf;
use std::time::Duration;
