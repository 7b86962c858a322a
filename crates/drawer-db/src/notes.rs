//! Note repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use drawer_core::{Error, NewNote, Note, NoteRepository, NoteUpdate, Result};

/// PostgreSQL implementation of [`NoteRepository`].
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    /// Create a new repository backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const NOTE_COLUMNS: &str = "id, content, reminder_date, reminder_time, is_completed, created_at";

fn map_note(row: &PgRow) -> Note {
    Note {
        id: row.get("id"),
        content: row.get("content"),
        reminder_date: row.get("reminder_date"),
        reminder_time: row.get("reminder_time"),
        is_completed: row.get("is_completed"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notes ORDER BY created_at DESC, id DESC",
            NOTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_note).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_note))
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let row = sqlx::query(&format!(
            "INSERT INTO notes (content, reminder_date, reminder_time, is_completed) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(&note.content)
        .bind(note.reminder_date)
        .bind(&note.reminder_time)
        .bind(note.is_completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_note(&row))
    }

    async fn update(&self, id: i32, updates: NoteUpdate) -> Result<Note> {
        // COALESCE keeps absent fields unchanged; provided fields win.
        let row = sqlx::query(&format!(
            "UPDATE notes SET \
             content = COALESCE($2, content), \
             reminder_date = COALESCE($3, reminder_date), \
             reminder_time = COALESCE($4, reminder_time), \
             is_completed = COALESCE($5, is_completed) \
             WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(updates.content)
        .bind(updates.reminder_date)
        .bind(updates.reminder_time)
        .bind(updates.is_completed)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(map_note)
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
