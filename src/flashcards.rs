#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FlashcardSet {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Flashcard {
    pub id: i64,
    pub set_id: i64,
    pub front_text: String,
    pub back_text: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashcardSetWithCards {
    #[serde(flatten)]
    pub set: FlashcardSet,
    pub cards: Vec<Flashcard>,
}

pub async fn fetch_all_sets(pool: &SqlitePool) -> Result<Vec<FlashcardSet>> {
    let sets = sqlx::query_as::<_, FlashcardSet>(
        "SELECT id, title, description, category, created_at FROM flashcard_sets ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(sets)
}

pub async fn fetch_sets_in_category(pool: &SqlitePool, category: &str) -> Result<Vec<FlashcardSet>> {
    let sets = sqlx::query_as::<_, FlashcardSet>(
        r#"
        SELECT id, title, description, category, created_at
        FROM flashcard_sets
        WHERE category = ?
        ORDER BY title ASC
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(sets)
}

pub async fn fetch_set_with_cards(
    pool: &SqlitePool,
    set_id: i64,
) -> Result<Option<FlashcardSetWithCards>> {
    let set = sqlx::query_as::<_, FlashcardSet>(
        "SELECT id, title, description, category, created_at FROM flashcard_sets WHERE id = ?",
    )
    .bind(set_id)
    .fetch_optional(pool)
    .await?;

    let Some(set) = set else {
        return Ok(None);
    };

    let cards = sqlx::query_as::<_, Flashcard>(
        "SELECT id, set_id, front_text, back_text, hint FROM flashcards WHERE set_id = ? ORDER BY id ASC",
    )
    .bind(set_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(FlashcardSetWithCards { set, cards }))
}

pub(crate) async fn find_set_id(
    conn: &mut SqliteConnection,
    title: &str,
    category: Option<&str>,
    dedup: DedupKey,
) -> Result<Option<i64>> {
    let id = match dedup {
        DedupKey::Title => {
            sqlx::query_scalar::<_, i64>(
                "SELECT id FROM flashcard_sets WHERE title = ? ORDER BY id LIMIT 1",
            )
            .bind(title)
            .fetch_optional(&mut *conn)
            .await?
        }
        DedupKey::TitleAndCategory => {
            sqlx::query_scalar::<_, i64>(
                "SELECT id FROM flashcard_sets WHERE title = ? AND category IS ? ORDER BY id LIMIT 1",
            )
            .bind(title)
            .bind(category)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    Ok(id)
}

pub(crate) async fn find_other_set_id(
    conn: &mut SqliteConnection,
    title: &str,
    id: i64,
) -> Result<Option<i64>> {
    let other = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM flashcard_sets WHERE title = ? AND id <> ? ORDER BY id LIMIT 1",
    )
    .bind(title)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(other)
}

pub(crate) async fn insert_set(
    conn: &mut SqliteConnection,
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO flashcard_sets (title, description, category)
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

pub(crate) async fn insert_cards(
    conn: &mut SqliteConnection,
    set_id: i64,
    cards: &[CardEntry],
) -> Result<u64> {
    let mut inserted = 0;
    for chunk in cards.chunks(BULK_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO flashcards (set_id, front_text, back_text, hint) ");
        builder.push_values(chunk, |mut row, card| {
            row.push_bind(set_id)
                .push_bind(card.front.as_str())
                .push_bind(card.back.as_str())
                .push_bind(card.hint.as_deref());
        });
        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

use crate::config::DedupKey;
use crate::content_bank::CardEntry;
use crate::error::Result;
use crate::quizzes::BULK_CHUNK;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
