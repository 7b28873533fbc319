/// A CLI that keeps the quiz and flashcard library in sync with its content folder.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute. If no command is given, help is shown.
    #[command(subcommand)]
    command: Option<Commands>,

    /// SQLite database URL.
    #[arg(long, env = "QUIZBANK_DATABASE_URL", default_value = "sqlite:quizbank.db")]
    database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "QUIZBANK_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Root folder holding the quiz and flashcard JSON files.
    #[arg(long, env = "QUIZBANK_CONTENT_ROOT", default_value = "./Courses")]
    content_root: PathBuf,

    /// How content is laid out under the root.
    #[arg(long, env = "QUIZBANK_LAYOUT", value_enum, default_value_t = LayoutArg::Nested)]
    layout: LayoutArg,

    /// Kind of the plain `*.json` files in a flat layout.
    #[arg(long, env = "QUIZBANK_FLAT_KIND", value_enum, default_value_t = KindArg::Flashcard)]
    flat_kind: KindArg,

    /// Fields that identify already-imported content.
    #[arg(long, env = "QUIZBANK_DEDUP", value_enum, default_value_t = DedupArg::TitleAndCategory)]
    dedup: DedupArg,

    /// Deepest folder level the content walk descends into.
    #[arg(long, env = "QUIZBANK_MAX_DEPTH", default_value_t = 16)]
    max_depth: usize,

    /// How many times to check for the schema before giving up.
    #[arg(long, env = "QUIZBANK_SCHEMA_ATTEMPTS", default_value_t = 15)]
    schema_attempts: u32,

    /// Milliseconds between schema checks.
    #[arg(long, env = "QUIZBANK_SCHEMA_INTERVAL_MS", default_value_t = 2000)]
    schema_interval_ms: u64,

    /// Do not apply the bundled migrations; expect the schema to be managed elsewhere.
    #[arg(long, env = "QUIZBANK_SKIP_MIGRATIONS")]
    skip_migrations: bool,

    /// Do not sync content before running the command.
    #[arg(long, env = "QUIZBANK_SKIP_STARTUP_SYNC")]
    skip_startup_sync: bool,

    /// Log level for this crate (overridden by RUST_LOG).
    #[arg(long, env = "QUIZBANK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, env = "QUIZBANK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Imports new content from the content root.
    Sync {
        /// What to sync.
        #[arg(value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
        /// Print the full report instead of the completion message.
        #[arg(long)]
        report: bool,
    },

    /// Lists course names.
    Courses,

    /// Shows the quizzes and flashcard sets of one course.
    Course { category: String },

    /// Shows per-course content counts.
    Stats,

    /// Lists all quizzes, newest first.
    Quizzes,

    /// Shows one quiz with its questions.
    Quiz { id: i64 },

    /// Lists all flashcard sets, newest first.
    Flashcards,

    /// Shows one flashcard set with its cards.
    #[command(name = "flashcard-set")]
    FlashcardSet { id: i64 },

    /// Records a quiz score.
    #[command(name = "result")]
    Record {
        /// The quiz ID.
        quiz_id: i64,
        /// Score percentage.
        #[arg(value_parser = clap::value_parser!(i64).range(0..=100))]
        score: i64,
    },

    /// Grades answers (A-D, in question order) and records the score.
    Grade {
        quiz_id: i64,
        #[arg(required = true)]
        answers: Vec<AnswerOption>,
    },

    /// Shows the most recent quiz attempts.
    Recent {
        #[arg(long, short, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Nested,
    Flat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Quiz,
    Flashcard,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DedupArg {
    Title,
    TitleAndCategory,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    All,
    Quizzes,
    Flashcards,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        let layout = match self.layout {
            LayoutArg::Nested => LayoutStrategy::NestedByCourse,
            LayoutArg::Flat => LayoutStrategy::Flat {
                kind: match self.flat_kind {
                    KindArg::Quiz => ContentKind::Quiz,
                    KindArg::Flashcard => ContentKind::FlashcardSet,
                },
            },
        };
        let dedup = match self.dedup {
            DedupArg::Title => DedupKey::Title,
            DedupArg::TitleAndCategory => DedupKey::TitleAndCategory,
        };

        SyncConfig::new(&self.content_root)
            .with_layout(layout)
            .with_dedup(dedup)
            .with_max_depth(self.max_depth)
    }

    fn schema_wait(&self) -> SchemaWait {
        SchemaWait {
            attempts: self.schema_attempts.max(1),
            interval: Duration::from_millis(self.schema_interval_ms),
        }
    }
}

/// Converts the CLI scope to the sync scope.
fn map_scope(scope: ScopeArg) -> SyncScope {
    match scope {
        ScopeArg::All => SyncScope::All,
        ScopeArg::Quizzes => SyncScope::Quizzes,
        ScopeArg::Flashcards => SyncScope::FlashcardSets,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Parse CLI commands ---
    let mut cli = Cli::parse();
    let Some(command) = cli.command.take() else {
        // If no command was given, print help.
        Cli::parse_from(["", "--help"]);
        return Ok(());
    };
    init_logging(&cli.log_level, cli.log_format)?;

    // --- Database Setup ---
    let db_config = DatabaseConfig::new(cli.database_url.clone()).max_connections(cli.max_connections);
    let pool = db::connect(&db_config)
        .await
        .with_context(|| format!("Failed to open database '{}'", cli.database_url))?;
    if !cli.skip_migrations {
        db::run_migrations(&pool).await?;
    }
    db::wait_for_schema(&pool, cli.schema_wait())
        .await
        .context("Database schema did not load in time")?;

    let orchestrator = SyncOrchestrator::new(pool.clone(), cli.sync_config());
    let service = ContentService::new(pool, orchestrator);

    // --- Startup sync, best effort ---
    if !cli.skip_startup_sync && !matches!(command, Commands::Sync { .. }) {
        if let Err(e) = service.sync_report(SyncScope::All).await {
            warn!(error = %e, "Startup sync failed, continuing");
        }
    }

    // --- Handle Subcommands ---
    match command {
        Commands::Sync { scope, report } => {
            let scope = map_scope(scope);
            if report {
                print_json(&service.sync_report(scope).await.context("Sync failed")?)?;
            } else {
                match service.sync(scope).await {
                    Ok(message) => print_json(&message)?,
                    Err(e) => {
                        print_json(&serde_json::json!({
                            "success": false,
                            "error": "Sync failed",
                            "details": e.to_string(),
                        }))?;
                        return Err(e).context("Sync failed");
                    }
                }
            }
        }
        Commands::Courses => print_json(&service.list_courses().await?)?,
        Commands::Course { category } => print_json(&service.course_overview(&category).await?)?,
        Commands::Stats => print_json(&service.course_stats().await?)?,
        Commands::Quizzes => print_json(&service.list_quizzes().await?)?,
        Commands::Quiz { id } => print_json(&service.get_quiz(id).await?)?,
        Commands::Flashcards => print_json(&service.list_flashcard_sets().await?)?,
        Commands::FlashcardSet { id } => print_json(&service.get_flashcard_set(id).await?)?,
        Commands::Record { quiz_id, score } => {
            print_json(&service.record_result(quiz_id, score).await?)?
        }
        Commands::Grade { quiz_id, answers } => {
            print_json(&service.grade_quiz(quiz_id, &answers).await?)?
        }
        Commands::Recent { limit } => print_json(&service.recent_results(limit).await?)?,
    }

    Ok(())
}

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use quizbank::classifier::ContentKind;
use quizbank::db;
use quizbank::logging::{init_logging, LogFormat};
use quizbank::quizzes::AnswerOption;
use quizbank::service::DEFAULT_RECENT_LIMIT;
use quizbank::{
    ContentService, DatabaseConfig, DedupKey, LayoutStrategy, SchemaWait, SyncConfig,
    SyncOrchestrator, SyncScope,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
